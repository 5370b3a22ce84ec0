// src/utils/log.rs

//! Banner-style progress output routed through the `log` facade.
//!
//! The binary decides where records go (env_logger in the CLI); these
//! helpers only shape the messages.

/// Width of header rules.
const RULE_WIDTH: usize = 60;

/// Log a header framed by rules.
pub fn header(title: &str) {
    let border = "═".repeat(RULE_WIDTH);
    log::info!("{border}");
    log::info!("  {title}");
    log::info!("{border}");
}

/// Log a step in a multi-step process.
pub fn step(step_num: usize, total: usize, message: &str) {
    log::info!("{}", format_step(step_num, total, message));
}

/// Log an indented detail line.
pub fn sub_item(message: &str) {
    log::info!("    {message}");
}

/// Log a summary section with key/value lines.
pub fn summary(title: &str, items: &[(&str, String)]) {
    log::info!("[SUMMARY] {title}");
    for (key, value) in items {
        log::info!("    {key}: {value}");
    }
}

fn format_step(step_num: usize, total: usize, message: &str) -> String {
    format!("[STEP {step_num}/{total}] {message}")
}
