//! Operator confirmation before side effects.

use dialoguer::theme::ColorfulTheme;
use tracing::warn;

/// Decides whether a run may proceed past a checkpoint.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

/// Proceeds at every checkpoint.
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysConfirm;

impl Confirm for AlwaysConfirm {
    fn confirm(&mut self, _prompt: &str) -> bool {
        true
    }
}

/// Terminal prompt. Enter (or `y`) proceeds; `n`, Esc or a terminal that
/// cannot be prompted stops.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&mut self, prompt: &str) -> bool {
        let answer = dialoguer::Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .default(true)
            .interact_opt();
        proceeds(answer)
    }
}

fn proceeds(answer: dialoguer::Result<Option<bool>>) -> bool {
    match answer {
        Ok(Some(yes)) => yes,
        // Esc / q
        Ok(None) => false,
        Err(err) => {
            warn!(%err, "confirmation prompt unavailable, stopping");
            false
        }
    }
}
