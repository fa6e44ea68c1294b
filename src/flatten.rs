use crate::{
    catalog::{Catalog, Entry},
    error::InvariantViolation,
};

/// Paths for `entry` with its ancestors' paths first: root ancestor's own
/// paths lead, the entry's own paths come last.
pub fn flatten(catalog: &Catalog, entry: Option<&Entry>) -> Result<Vec<String>, InvariantViolation> {
    let Some(entry) = entry else {
        return Ok(Vec::new());
    };

    let mut chain = vec![entry];
    let mut visited = vec![entry.code.trim().to_lowercase()];
    let mut current = entry;
    while let Some(parent_code) = current.parent_code() {
        let key = parent_code.to_lowercase();
        if visited.contains(&key) {
            let mut names: Vec<String> = chain.iter().map(|e| e.code.clone()).collect();
            names.push(parent_code.to_string());
            return Err(InvariantViolation::ParentCycle {
                code: parent_code.to_string(),
                chain: names,
            });
        }
        let parent = catalog
            .lookup(parent_code)
            .ok_or_else(|| InvariantViolation::MissingParent {
                code: current.code.clone(),
                parent: parent_code.to_string(),
            })?;
        visited.push(key);
        chain.push(parent);
        current = parent;
    }

    Ok(chain
        .iter()
        .rev()
        .flat_map(|link| link.paths.iter().cloned())
        .collect())
}

/// Each entry flattened on its own, concatenated in the given order.
pub fn flatten_all<'a, I>(catalog: &Catalog, entries: I) -> Result<Vec<String>, InvariantViolation>
where
    I: IntoIterator<Item = &'a Entry>,
{
    let mut paths = Vec::new();
    for entry in entries {
        paths.extend(flatten(catalog, Some(entry))?);
    }
    Ok(paths)
}
