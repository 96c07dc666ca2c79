//! Application-level configuration constants.

// Worker registration
pub const SW_SCRIPT_PATH: &str = "/sw.js";

// UI behavior
pub const STATUS_DISMISS_MS: u32 = 4000;

// User-facing prompts for the destructive clear action
pub const CLEAR_CONFIRM_PROMPT: &str = "Tem certeza que deseja apagar todo o histórico gerado \
deste dispositivo?\n\nEssa ação não pode ser desfeita.";
pub const CLEAR_DONE_NOTICE: &str = "Histórico limpo com sucesso.";
