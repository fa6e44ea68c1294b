use crate::{
    config::{Executable, LauncherConfig},
    error::LaunchError,
    flatten::{flatten, flatten_all},
    menu::Session,
};
use std::{
    path::PathBuf,
    process::{Child, Command},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPlan {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl LaunchPlan {
    /// Argument order: `-iwad <file>` when an override exists (mod first,
    /// then level), `-file`, level paths, mutator paths, mod paths, then
    /// pass-through arguments.
    pub fn build(
        config: &LauncherConfig,
        executable: &Executable,
        session: &Session,
        passthrough: &[String],
    ) -> Result<Self, LaunchError> {
        let active_mod = session
            .active_mod(config)
            .ok_or(LaunchError::NoModSelected)?;
        let active_level = session.active_level(config);

        let mut args = Vec::new();
        let iwad = active_mod
            .alt_iwad()
            .or_else(|| active_level.and_then(|level| level.alt_iwad()));
        if let Some(iwad) = iwad {
            args.push("-iwad".to_string());
            args.push(iwad.to_string());
        }

        args.push("-file".to_string());
        args.extend(flatten(&config.levels, active_level)?);
        args.extend(flatten_all(
            &config.mutators,
            session.active_mutators(config),
        )?);
        args.extend(flatten(&config.mods, Some(active_mod))?);
        args.extend(passthrough.iter().cloned());

        Ok(Self {
            program: PathBuf::from(executable.path.trim()),
            args,
        })
    }

    /// Single-string form; tokens containing a space are quoted.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.display().to_string())
            .chain(self.args.iter().cloned())
            .map(|token| quote(&token))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn args_line(&self) -> String {
        self.args
            .iter()
            .map(|token| quote(token))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Starts the game and returns without waiting for it. The child keeps
    /// the launcher's working directory, so relative wad paths resolve
    /// against it.
    pub fn spawn(&self) -> Result<Child, LaunchError> {
        let child = Command::new(&self.program)
            .args(&self.args)
            .spawn()
            .map_err(|source| LaunchError::Spawn {
                path: self.program.clone(),
                source,
            })?;
        log::info!("started {} (pid {})", self.program.display(), child.id());
        Ok(child)
    }
}

fn quote(token: &str) -> String {
    if token.contains(' ') {
        format!("\"{token}\"")
    } else {
        token.to_string()
    }
}
