use anyhow::{Context, Result};
use console::{Style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use rpassword::read_password;
use std::io::{self, Write};
use std::time::{Duration, Instant};
use unicode_normalization::UnicodeNormalization;
use zeroize::Zeroizing;

use crate::kdf;
use crate::strength::{Category, StrengthReport};

pub const MIN_SAFE_ENTROPY: f64 = 100.0;

pub const MIN_MASTER_BYTES: usize = 12;
pub const MIN_SAFE_PASSWORD_LENGTH: usize = 16;

pub const MAX_MASTER_BYTES: usize = 1024 * 1024;
pub const MAX_SERVICE_BYTES: usize = 1024 * 1024;

const METER_WIDTH: usize = 20;

pub struct InputInfo {
    pub service_identifier: String,
    pub master_byte_length: usize,
    pub master_char_count: usize,
}

pub struct OutputConfig {
    pub password_length: usize,
    pub alphabet_size: usize,
}

pub struct DisplayOptions {
    pub unicode_support: bool,
    pub color_support: bool,
    pub quiet: bool,
}

pub fn detect_unicode_support() -> bool {
    supports_unicode::on(supports_unicode::Stream::Stdout)
}

pub fn detect_color_support() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

pub fn get_status_symbols(unicode_support: bool) -> (&'static str, &'static str) {
    if unicode_support {
        ("✓", "!")
    } else {
        ("+", "!")
    }
}

fn validate_control_characters(s: &str, input_name: &str) -> Result<String> {
    let control_chars: Vec<(usize, char)> = s
        .chars()
        .enumerate()
        .filter(|(_, c)| c.is_control())
        .collect();

    if !control_chars.is_empty() {
        let term = Term::stderr();

        let warning_msg = format!(
            "WARNING: {} contains {} control character(s) at position(s): {}",
            input_name,
            control_chars.len(),
            control_chars
                .iter()
                .map(|(pos, _)| pos.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );

        term.write_line(&warning_msg)?;
        term.write_str("Continue anyway? [y/N]: ")?;
        term.flush()?;

        let mut response = String::new();
        io::stdin().read_line(&mut response)?;
        let response = response.trim().to_lowercase();

        term.clear_last_lines(2)?;

        if response != "y" && response != "yes" {
            eprintln!("Aborted.");
            std::process::exit(1);
        }
    }

    Ok(s.to_string())
}

fn normalize_and_validate(s: &str, input_name: &str) -> Result<String> {
    let trimmed = s.trim();
    let normalized: String = trimmed.nfc().collect();
    validate_control_characters(&normalized, input_name)
}

pub fn prompt_service_identifier() -> Result<String> {
    print!("Service: ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    let normalized = normalize_and_validate(&input, "Service identifier")?;

    if normalized.is_empty() {
        anyhow::bail!("Service identifier cannot be empty");
    }

    if normalized.len() > MAX_SERVICE_BYTES {
        anyhow::bail!(
            "Service identifier too long ({} bytes, maximum is {})",
            normalized.len(),
            MAX_SERVICE_BYTES
        );
    }

    Ok(normalized)
}

pub fn prompt_master_secret() -> Result<(Zeroizing<String>, usize, usize)> {
    print!("Master secret: ");
    io::stdout().flush()?;
    let password = Zeroizing::new(read_password().context("Failed to fetch master secret")?);

    if password.is_empty() {
        anyhow::bail!("Master secret cannot be empty");
    }

    print!("Confirm master secret: ");
    io::stdout().flush()?;
    let confirmation =
        Zeroizing::new(read_password().context("Failed to fetch confirmation")?);

    if *password != *confirmation {
        anyhow::bail!("Master secrets do not match");
    }

    let normalized = Zeroizing::new(normalize_and_validate(&password, "Master secret")?);

    let byte_length = normalized.len();
    if byte_length > MAX_MASTER_BYTES {
        anyhow::bail!(
            "Master secret too long ({} bytes, maximum is {})",
            byte_length,
            MAX_MASTER_BYTES
        );
    }

    let char_count = normalized.chars().count();
    Ok((normalized, byte_length, char_count))
}

pub fn prompt_candidate_password() -> Result<Zeroizing<String>> {
    print!("Password: ");
    io::stdout().flush()?;

    let password = read_password().context("Failed to fetch password")?;
    Ok(Zeroizing::new(password))
}

pub fn show_progress<F, T>(unicode_support: bool, f: F) -> Result<(T, Duration)>
where
    F: FnOnce() -> Result<T>,
{
    println!();

    let term = Term::stdout();
    term.hide_cursor().ok();

    let pb = ProgressBar::new_spinner();

    if unicode_support {
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&[
                    "⠁", "⠂", "⠄", "⡀", "⡈", "⡐", "⡠", "⣀", "⣁", "⣂", "⣄", "⣌", "⣔", "⣤", "⣥", "⣦",
                    "⣮", "⣶", "⣷", "⣿", "⡿", "⠿", "⢟", "⠟", "⡛", "⠛", "⠫", "⢋", "⠋", "⠍", "⡉", "⠉",
                    "⠑", "⠡", "⢁", "⠁",
                ]),
        );
    } else {
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_chars("-\\|/-"),
        );
    }

    pb.set_message("Deriving password...");
    pb.enable_steady_tick(Duration::from_millis(80));

    let start = Instant::now();
    let result = f();
    let elapsed = start.elapsed();

    pb.finish_and_clear();
    term.show_cursor().ok();

    result.map(|r| (r, elapsed))
}

pub fn display_output(
    password: &Zeroizing<String>,
    input_info: &InputInfo,
    config: &OutputConfig,
    report: &StrengthReport,
    elapsed: Duration,
    options: &DisplayOptions,
) {
    if options.quiet {
        println!("{}", &**password);
        return;
    }

    println!("{}\n", &**password);

    let entropy = config.password_length as f64 * (config.alphabet_size as f64).log2();

    display_settings(input_info, config, options);
    display_stats(entropy, report, elapsed, options);
}

fn display_settings(input_info: &InputInfo, config: &OutputConfig, options: &DisplayOptions) {
    let (check_ok, check_warn) = get_status_symbols(options.unicode_support);

    let master_bytes_secure = input_info.master_byte_length >= MIN_MASTER_BYTES;
    let length_secure = config.password_length >= MIN_SAFE_PASSWORD_LENGTH;

    let master_style = status_style(master_bytes_secure, options.color_support);
    let length_style = status_style(length_secure, options.color_support);

    let master_status = if master_bytes_secure {
        check_ok
    } else {
        check_warn
    };
    let length_status = if length_secure { check_ok } else { check_warn };

    println!("Settings:");

    println!(
        "  ├─ KDF        PBKDF2-HMAC-SHA384 (i={}, dk={} bytes)",
        kdf::ITERATIONS,
        kdf::OUTPUT_LEN
    );

    println!("  ├─ Service    {}", input_info.service_identifier);

    println!(
        "  ├─ Master     {} {} {} ({} {})",
        master_style.apply_to(format!("[{}]", master_status)),
        master_style.apply_to(input_info.master_byte_length),
        if input_info.master_byte_length == 1 {
            "byte"
        } else {
            "bytes"
        },
        master_style.apply_to(input_info.master_char_count),
        if input_info.master_char_count == 1 {
            "char"
        } else {
            "chars"
        }
    );

    println!("  ├─ Alphabet   {} chars", config.alphabet_size);

    println!(
        "  └─ Length     {} {} {}",
        length_style.apply_to(format!("[{}]", length_status)),
        length_style.apply_to(config.password_length),
        if config.password_length == 1 {
            "char"
        } else {
            "chars"
        }
    );

    println!();
}

fn display_stats(
    entropy: f64,
    report: &StrengthReport,
    elapsed: Duration,
    options: &DisplayOptions,
) {
    let (check_ok, check_warn) = get_status_symbols(options.unicode_support);

    let entropy_secure = entropy >= MIN_SAFE_ENTROPY;
    let entropy_style = status_style(entropy_secure, options.color_support);
    let entropy_status = if entropy_secure { check_ok } else { check_warn };
    let entropy_text = if entropy_secure { "Strong" } else { "Weak" };

    let strength_secure = report.category >= Category::Strong;
    let strength_status = if strength_secure { check_ok } else { check_warn };
    let strength_style = category_style(report.category, options.color_support);

    println!("Stats:");

    println!(
        "  ├─ Entropy    {} {} bits ({})",
        entropy_style.apply_to(format!("[{}]", entropy_status)),
        entropy_style.apply_to(format!("{:.1}", entropy)),
        entropy_style.apply_to(entropy_text)
    );

    println!(
        "  ├─ Strength   {} {} {}/100 ({})",
        strength_style.apply_to(format!("[{}]", strength_status)),
        strength_style.apply_to(render_meter(report.score, options.unicode_support)),
        strength_style.apply_to(report.score),
        strength_style.apply_to(report.category.label())
    );

    println!("  └─ Time       {:.1}s", elapsed.as_secs_f64());
}

pub fn display_strength(report: &StrengthReport, options: &DisplayOptions) {
    if options.quiet {
        println!("{} {}", report.score, report.category.label());
        return;
    }

    let style = category_style(report.category, options.color_support);

    println!(
        "\n{} {}/100 ({})",
        style.apply_to(render_meter(report.score, options.unicode_support)),
        style.apply_to(report.score),
        style.apply_to(report.category.label())
    );
}

fn status_style(secure: bool, color_support: bool) -> Style {
    if color_support {
        if secure {
            Style::new().green()
        } else {
            Style::new().yellow()
        }
    } else {
        Style::new()
    }
}

fn category_style(category: Category, color_support: bool) -> Style {
    if !color_support {
        return Style::new();
    }

    match category {
        Category::VeryStrong => Style::new().green(),
        Category::Strong => Style::new().blue(),
        Category::Moderate => Style::new().yellow(),
        Category::Weak | Category::VeryWeak => Style::new().red(),
    }
}

fn render_meter(score: u8, unicode_support: bool) -> String {
    let (filled_char, empty_char) = if unicode_support {
        ('█', '░')
    } else {
        ('#', '-')
    };

    let filled = (score as usize * METER_WIDTH) / 100;

    let mut meter = String::with_capacity(METER_WIDTH * filled_char.len_utf8());
    for _ in 0..filled {
        meter.push(filled_char);
    }
    for _ in filled..METER_WIDTH {
        meter.push(empty_char);
    }
    meter
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_status_symbols_unicode() {
        let (ok, warn) = get_status_symbols(true);
        assert_eq!(ok, "✓");
        assert_eq!(warn, "!");
    }

    #[test]
    fn test_get_status_symbols_ascii() {
        let (ok, warn) = get_status_symbols(false);
        assert_eq!(ok, "+");
        assert_eq!(warn, "!");
    }

    #[test]
    fn test_normalize_nfc() {
        let nfc = "café";
        let nfd = "cafe\u{0301}";

        assert_ne!(nfc.as_bytes(), nfd.as_bytes());

        let normalized_nfc = normalize_and_validate(nfc, "test").unwrap();
        let normalized_nfd = normalize_and_validate(nfd, "test").unwrap();

        assert_eq!(normalized_nfc, normalized_nfd);
        assert_eq!(normalized_nfc.as_bytes(), normalized_nfd.as_bytes());
    }

    #[test]
    fn test_trim_whitespace() {
        let cases = vec![
            ("  example.com  ", "example.com"),
            ("\texample.com\t", "example.com"),
            ("\nexample.com\n", "example.com"),
            ("  two words  ", "two words"),
        ];

        for (input, expected) in cases {
            let normalized = normalize_and_validate(input, "test").unwrap();
            assert_eq!(normalized, expected);
        }
    }

    #[test]
    fn test_normalization_idempotent() {
        let input = "café\u{0301}";

        let first = normalize_and_validate(input, "test").unwrap();
        let second = normalize_and_validate(&first, "test").unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_after_trim() {
        let inputs = vec!["   ", "\t\t", ""];

        for input in inputs {
            let normalized = normalize_and_validate(input, "test").unwrap();
            assert_eq!(normalized, "");
        }
    }

    #[test]
    fn test_meter_width() {
        for score in [0u8, 1, 35, 50, 99, 100] {
            let unicode = render_meter(score, true);
            let ascii = render_meter(score, false);
            assert_eq!(unicode.chars().count(), METER_WIDTH);
            assert_eq!(ascii.chars().count(), METER_WIDTH);
        }
    }

    #[test]
    fn test_meter_fill_boundaries() {
        assert_eq!(render_meter(0, false), "-".repeat(METER_WIDTH));
        assert_eq!(render_meter(100, false), "#".repeat(METER_WIDTH));

        let half = render_meter(50, false);
        assert_eq!(half.matches('#').count(), METER_WIDTH / 2);
    }
}
