use rackfit::config::ConfigWarning;
use rackfit::presentation::TextRenderer;

use super::terminal::detect_capabilities;

pub fn renderer(verbose: u8) -> TextRenderer {
    let caps = detect_capabilities();
    TextRenderer {
        color: caps.supports_color,
        unicode: caps.supports_unicode,
        verbose,
    }
}

pub fn print_config_warnings(warnings: &[ConfigWarning]) {
    for w in warnings {
        if let Some(line) = w.line {
            eprintln!("⚠ Unknown config key '{}' in {}:{}", w.key, w.file.display(), line);
        } else {
            eprintln!("⚠ Unknown config key '{}' in {}", w.key, w.file.display());
        }

        if let Some(suggestion) = &w.suggestion {
            eprintln!("   Did you mean '{}'?\n", suggestion);
        }
    }
}
