//! Interactive selection and value delivery through desktop tools.
use anyhow::Result;

use crate::notify;
use crate::tools::{ToolKind, Toolchain};

/// Prompt arguments understood by a menu program.
fn prompt_args(program: &str, prompt: &str) -> Vec<String> {
    match program {
        "fuzzel" => vec![format!("--prompt={prompt}: ")],
        "wofi" => vec!["--prompt".to_string(), prompt.to_string()],
        "rofi" | "bemenu" | "dmenu" => vec!["-p".to_string(), prompt.to_string()],
        _ => Vec::new(),
    }
}

/// Selection menu backed by the resolved [`ToolKind::Menu`] tool.
#[derive(Debug, Clone, Copy)]
pub struct Menu<'a> {
    tools: &'a Toolchain<'a>,
}

impl<'a> Menu<'a> {
    /// Create a menu over `tools`.
    #[must_use]
    pub const fn new(tools: &'a Toolchain<'a>) -> Self {
        Self { tools }
    }

    /// Present `items` and return the chosen line.
    ///
    /// Returns `Ok(None)` when the user cancels: the menu exits non-zero
    /// or prints nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if no menu tool is available or it cannot be started.
    pub fn choose<S: AsRef<str>>(&self, prompt: &str, items: &[S]) -> Result<Option<String>> {
        let tool = self.tools.get(ToolKind::Menu)?;
        let extra = prompt_args(&tool.program, prompt);
        let extra: Vec<&str> = extra.iter().map(String::as_str).collect();
        let input = items
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join("\n");

        let result = self.tools.executor().run_unchecked_with_input(
            &tool.program,
            &tool.args_with(&extra),
            &input,
        )?;
        if !result.success {
            tracing::debug!("{prompt}: menu cancelled (exit {:?})", result.code);
            return Ok(None);
        }
        let choice = result.stdout.trim_end_matches(['\n', '\r']);
        if choice.is_empty() {
            return Ok(None);
        }
        Ok(Some(choice.to_string()))
    }
}

/// How a chosen value reaches the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Delivery {
    /// Write to the clipboard.
    #[default]
    Copy,
    /// Inject as keystrokes into the focused window.
    Type,
}

/// Delivers values with the clipboard or keystroke tools.
#[derive(Debug, Clone, Copy)]
pub struct Deliverer<'a> {
    tools: &'a Toolchain<'a>,
    mode: Delivery,
}

impl<'a> Deliverer<'a> {
    /// Create a deliverer using `mode`.
    #[must_use]
    pub const fn new(tools: &'a Toolchain<'a>, mode: Delivery) -> Self {
        Self { tools, mode }
    }

    /// Delivery mode in use.
    #[must_use]
    pub const fn mode(&self) -> Delivery {
        self.mode
    }

    /// Deliver `value`. `label` names it in the copy notification and must
    /// not contain the value itself.
    ///
    /// # Errors
    ///
    /// Returns an error if the tool is missing or fails.
    pub fn deliver(&self, label: &str, value: &str) -> Result<()> {
        match self.mode {
            Delivery::Copy => {
                self.copy(value)?;
                notify::send(self.tools.executor(), "Copied to clipboard", label);
            }
            Delivery::Type => self.type_text(value)?,
        }
        Ok(())
    }

    /// Type `username`, press tab, then type `password`.
    ///
    /// # Errors
    ///
    /// Returns an error if a keystroke tool is missing or fails.
    pub fn autotype(&self, username: &str, password: &str) -> Result<()> {
        self.type_text(username)?;
        self.press_tab()?;
        self.type_text(password)
    }

    fn copy(&self, value: &str) -> Result<()> {
        let tool = self.tools.get(ToolKind::Clipboard)?;
        self.tools
            .executor()
            .run_with_input(&tool.program, &tool.args_with(&[]), value)?;
        tracing::debug!("copied with {}", tool.program);
        Ok(())
    }

    fn type_text(&self, text: &str) -> Result<()> {
        let tool = self.tools.get(ToolKind::Type)?;
        self.tools
            .executor()
            .run_with_input(&tool.program, &tool.args_with(&[]), text)?;
        Ok(())
    }

    fn press_tab(&self) -> Result<()> {
        let tool = self.tools.get(ToolKind::Tab)?;
        self.tools
            .executor()
            .run(&tool.program, &tool.args_with(&[]))?;
        Ok(())
    }
}
