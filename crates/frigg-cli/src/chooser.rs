//! Picking a file among a default and a few candidates.

use dialoguer::{theme::ColorfulTheme, FuzzySelect, Input};
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};

/// Last entry of every selection; asks for a path to type in.
pub const OTHER_PATH: &str = "Other path…";

/// Asks the user which file to use.
///
/// Returns `Ok(None)` when the user cancels; the calling command then stops
/// without further side effects.
pub trait Chooser {
    fn choose(
        &mut self,
        prompt: &str,
        candidates: &[PathBuf],
        default: &Path,
    ) -> io::Result<Option<PathBuf>>;
}

/// Always picks the default (`--yes`).
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultChooser;

impl Chooser for DefaultChooser {
    fn choose(
        &mut self,
        prompt: &str,
        _candidates: &[PathBuf],
        default: &Path,
    ) -> io::Result<Option<PathBuf>> {
        tracing::debug!(prompt, default = %default.display(), "using default");
        Ok(Some(default.to_path_buf()))
    }
}

/// Fuzzy selection on the terminal.
///
/// The default comes first, then the other candidates, then
/// [`OTHER_PATH`]. Esc or `q` cancels. Without a terminal on stdin the
/// default is taken, as with `--yes`.
pub struct PromptChooser {
    theme: ColorfulTheme,
    interactive: bool,
}

impl PromptChooser {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
            interactive: io::stdin().is_terminal(),
        }
    }

    /// Empty input cancels.
    fn ask_path(&self) -> io::Result<Option<PathBuf>> {
        let answer: String = Input::with_theme(&self.theme)
            .with_prompt("Path (empty to cancel)")
            .allow_empty(true)
            .interact_text()
            .map_err(prompt_error)?;

        let answer = answer.trim();
        Ok((!answer.is_empty()).then(|| PathBuf::from(answer)))
    }
}

impl Default for PromptChooser {
    fn default() -> Self {
        Self::new()
    }
}

impl Chooser for PromptChooser {
    fn choose(
        &mut self,
        prompt: &str,
        candidates: &[PathBuf],
        default: &Path,
    ) -> io::Result<Option<PathBuf>> {
        if !self.interactive {
            tracing::debug!(prompt, default = %default.display(), "stdin is not a terminal, using default");
            return Ok(Some(default.to_path_buf()));
        }

        let options = options(candidates, default);
        let picked = FuzzySelect::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(&labels(&options))
            .default(0)
            .interact_opt()
            .map_err(prompt_error)?;

        match picked {
            None => Ok(None),
            Some(i) if i < options.len() => Ok(Some(options[i].clone())),
            Some(_) => self.ask_path(),
        }
    }
}

/// The default followed by the candidates, without repeating the default.
fn options(candidates: &[PathBuf], default: &Path) -> Vec<PathBuf> {
    let mut options = vec![default.to_path_buf()];
    for candidate in candidates {
        if !options.contains(candidate) {
            options.push(candidate.clone());
        }
    }
    options
}

fn labels(options: &[PathBuf]) -> Vec<String> {
    let mut labels: Vec<String> = options
        .iter()
        .enumerate()
        .map(|(i, path)| {
            if i == 0 {
                format!("{} (default)", path.display())
            } else {
                path.display().to_string()
            }
        })
        .collect();
    labels.push(OTHER_PATH.to_string());
    labels
}

fn prompt_error(e: dialoguer::Error) -> io::Error {
    io::Error::other(e)
}
