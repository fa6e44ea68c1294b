use crate::{
    catalog::{Catalog, Entry, EntryRef},
    config::{Executable, LauncherConfig},
    error::LaunchError,
    resolver::{self, Outcome, Suggestion, MUTATOR_TOKEN, RANDOM_TOKEN},
};
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    PickMod,
    PickLevel,
    PickMutator,
    Execute,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Header,
    Category,
    Entry,
    Notice,
    Error,
}

/// Where menu text goes.
pub trait DisplaySink {
    /// Called once when a screen is entered.
    fn clear(&mut self) {}
    fn line(&mut self, kind: LineKind, text: &str);
    fn prompt(&mut self, text: &str);
}

/// One line per call; `None` once input is exhausted.
pub trait InputSource {
    fn read_line(&mut self) -> Option<String>;
}

/// What the user has picked so far. References point into the catalogs of
/// the [`LauncherConfig`] the menu was built from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub executable: String,
    pub mod_ref: Option<EntryRef>,
    pub level_ref: Option<EntryRef>,
    pub mutator_refs: Vec<EntryRef>,
}

impl Session {
    pub fn new(executable: &Executable) -> Self {
        Self {
            executable: executable.code.clone(),
            ..Self::default()
        }
    }

    pub fn active_mod<'c>(&self, config: &'c LauncherConfig) -> Option<&'c Entry> {
        self.mod_ref.and_then(|at| config.mods.get(at))
    }

    pub fn active_level<'c>(&self, config: &'c LauncherConfig) -> Option<&'c Entry> {
        self.level_ref.and_then(|at| config.levels.get(at))
    }

    pub fn active_mutators<'c>(&self, config: &'c LauncherConfig) -> Vec<&'c Entry> {
        self.mutator_refs
            .iter()
            .filter_map(|at| config.mutators.get(*at))
            .collect()
    }

    /// Chosen codes in mod, level, mutator order; absent picks are skipped.
    pub fn codes(&self, config: &LauncherConfig) -> Vec<String> {
        self.active_mod(config)
            .into_iter()
            .chain(self.active_level(config))
            .chain(self.active_mutators(config))
            .map(|entry| entry.code.trim().to_string())
            .collect()
    }
}

pub struct Menu<'a, R> {
    config: &'a LauncherConfig,
    session: Session,
    screen: Screen,
    return_to: Screen,
    visited: Vec<Screen>,
    rng: R,
}

impl<'a, R: Rng> Menu<'a, R> {
    pub fn new(config: &'a LauncherConfig, executable: &Executable, rng: R) -> Self {
        Self {
            config,
            session: Session::new(executable),
            screen: Screen::PickMod,
            return_to: Screen::PickMod,
            visited: vec![Screen::PickMod],
            rng,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn into_session(self) -> Session {
        self.session
    }

    /// Screens in the order they were entered, starting with `PickMod`.
    pub fn visited(&self) -> &[Screen] {
        &self.visited
    }

    /// Drives the screens until `Execute`. Rejected input re-prompts.
    pub fn run<I, D>(&mut self, input: &mut I, display: &mut D) -> Result<(), LaunchError>
    where
        I: InputSource,
        D: DisplaySink,
    {
        while self.screen != Screen::Execute {
            self.step(input, display)?;
        }
        Ok(())
    }

    /// Runs the current screen until it hands off to another one.
    pub fn step<I, D>(&mut self, input: &mut I, display: &mut D) -> Result<(), LaunchError>
    where
        I: InputSource,
        D: DisplaySink,
    {
        match self.screen {
            Screen::PickMod => self.pick_mod(input, display),
            Screen::PickLevel => {
                self.pick_level(input, display);
                Ok(())
            }
            Screen::PickMutator => {
                self.pick_mutator(input, display);
                Ok(())
            }
            Screen::Execute => Ok(()),
        }
    }

    fn pick_mod<I: InputSource, D: DisplaySink>(
        &mut self,
        input: &mut I,
        display: &mut D,
    ) -> Result<(), LaunchError> {
        let config = self.config;
        let mods = &config.mods;
        self.show(display, "Pick a gameplay wad:", mods);
        loop {
            let Some(line) = self.ask(input, display) else {
                return Err(LaunchError::InputClosed);
            };
            let picked = match resolver::resolve(&line, mods) {
                Outcome::Empty => {
                    display.line(LineKind::Error, "A gameplay wad is required.");
                    continue;
                }
                Outcome::SwitchToMutatorMenu => {
                    self.enter(Screen::PickMutator);
                    return Ok(());
                }
                Outcome::Random => self.draw(mods, display),
                Outcome::Selected(at) => Some(at),
                Outcome::NotFound(hits) => {
                    report_miss(display, &line, &hits, mods);
                    None
                }
            };
            let Some(at) = picked else {
                continue;
            };

            self.session.mod_ref = Some(at);
            let self_contained = mods.get(at).and_then(Entry::alt_iwad).is_some();
            if self_contained {
                log::debug!("mod carries its own iwad; skipping level screen");
                self.enter(Screen::Execute);
            } else {
                self.enter(Screen::PickLevel);
            }
            return Ok(());
        }
    }

    fn pick_level<I: InputSource, D: DisplaySink>(&mut self, input: &mut I, display: &mut D) {
        if self.session.active_mod(self.config).and_then(Entry::alt_iwad).is_some() {
            self.enter(Screen::Execute);
            return;
        }

        let config = self.config;
        let levels = &config.levels;
        self.show(display, "Pick a level wad (blank for none):", levels);
        loop {
            let line = self.ask(input, display).unwrap_or_default();
            let picked = match resolver::resolve(&line, levels) {
                Outcome::Empty => {
                    self.enter(Screen::Execute);
                    return;
                }
                Outcome::SwitchToMutatorMenu => {
                    self.enter(Screen::PickMutator);
                    return;
                }
                Outcome::Random => self.draw(levels, display),
                Outcome::Selected(at) => Some(at),
                Outcome::NotFound(hits) => {
                    report_miss(display, &line, &hits, levels);
                    None
                }
            };
            if let Some(at) = picked {
                self.session.level_ref = Some(at);
                self.enter(Screen::Execute);
                return;
            }
        }
    }

    fn pick_mutator<I: InputSource, D: DisplaySink>(&mut self, input: &mut I, display: &mut D) {
        let config = self.config;
        let mutators = &config.mutators;
        self.show(display, "Add a mutator (blank to go back):", mutators);
        loop {
            let line = self.ask(input, display).unwrap_or_default();
            let picked = match resolver::resolve(&line, mutators) {
                Outcome::Empty => break,
                Outcome::SwitchToMutatorMenu => {
                    display.line(LineKind::Error, "Already adding a mutator.");
                    continue;
                }
                Outcome::Random => self.draw(mutators, display),
                Outcome::Selected(at) => Some(at),
                Outcome::NotFound(hits) => {
                    report_miss(display, &line, &hits, mutators);
                    None
                }
            };
            if let Some(at) = picked {
                self.session.mutator_refs.push(at);
                break;
            }
        }
        self.enter(self.return_to);
    }

    fn enter(&mut self, next: Screen) {
        if next == Screen::PickMutator {
            self.return_to = self.screen;
        }
        self.screen = next;
        self.visited.push(next);
    }

    fn draw<D: DisplaySink>(&mut self, catalog: &Catalog, display: &mut D) -> Option<EntryRef> {
        let picked = catalog.random_entry(&mut self.rng);
        let rolled = picked.and_then(|at| Some((catalog.get(at)?, catalog.category_name(at)?)));
        match rolled {
            Some((entry, category)) => display.line(
                LineKind::Notice,
                &format!("Rolled {} - {} [{category}]", entry.code.trim(), entry.description),
            ),
            None => display.line(LineKind::Error, "Nothing to pick from."),
        }
        picked
    }

    fn ask<I: InputSource, D: DisplaySink>(&self, input: &mut I, display: &mut D) -> Option<String> {
        display.prompt("> ");
        input.read_line()
    }

    fn show<D: DisplaySink>(&self, display: &mut D, title: &str, catalog: &Catalog) {
        display.clear();
        display.line(LineKind::Header, &self.header());
        display.line(LineKind::Notice, "");
        display.line(LineKind::Notice, title);
        for line in listing_lines(catalog) {
            display.line(line.0, &line.1);
        }
        display.line(
            LineKind::Notice,
            &format!("'{RANDOM_TOKEN}' picks at random, '{MUTATOR_TOKEN}' adds a mutator."),
        );
    }

    fn header(&self) -> String {
        let code = |entry: Option<&Entry>| entry.map(|e| e.code.trim().to_string()).unwrap_or_default();
        let mutators: Vec<String> = self
            .session
            .active_mutators(self.config)
            .iter()
            .map(|entry| entry.code.trim().to_string())
            .collect();
        format!(
            "EXEC:{}  MOD:{}  LVL:{}  MUT:{}",
            self.session.executable,
            code(self.session.active_mod(self.config)),
            code(self.session.active_level(self.config)),
            mutators.join(",")
        )
    }
}

/// Category headings followed by `"<code> - <description>"` rows, codes
/// padded to a common width.
pub fn listing_lines(catalog: &Catalog) -> Vec<(LineKind, String)> {
    let groups = catalog.listing();
    let width = groups
        .iter()
        .flat_map(|(_, entries)| entries.iter().map(|entry| entry.code.trim().len()))
        .max()
        .unwrap_or(0);
    let mut lines = Vec::new();
    for (name, entries) in groups {
        lines.push((LineKind::Category, name.to_string()));
        for entry in entries {
            lines.push((
                LineKind::Entry,
                format!("{:<width$} - {}", entry.code.trim(), entry.description),
            ));
        }
        lines.push((LineKind::Entry, String::new()));
    }
    lines
}

fn report_miss<D: DisplaySink>(display: &mut D, input: &str, hits: &[Suggestion], catalog: &Catalog) {
    display.line(
        LineKind::Error,
        &format!("'{}' is not a known code.", input.trim()),
    );
    if hits.is_empty() {
        return;
    }
    display.line(LineKind::Notice, "Did you mean:");
    for hit in hits {
        if let Some(entry) = catalog.get(hit.at) {
            display.line(
                LineKind::Entry,
                &format!("  {} - {} ({}%)", entry.code.trim(), entry.description, hit.score),
            );
        }
    }
}
