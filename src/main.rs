mod alphabet;
mod generator;
mod kdf;
mod strength;
mod ui;

use anyhow::Result;
use clap::{Parser, ValueEnum};

use generator::DerivationRequest;

#[derive(Parser)]
#[command(
    name = "monopass",
    version,
    about = "Stateless per-service password derivation using PBKDF2-HMAC-SHA384"
)]
struct Cli {
    #[arg(short, long, value_enum, default_value = "derive")]
    mode: Mode,

    /// Password length in characters (8 to 32)
    #[arg(short, long, default_value_t = 16)]
    length: usize,

    /// Leave digits out of the alphabet
    #[arg(long)]
    no_digits: bool,

    /// Leave punctuation out of the alphabet
    #[arg(long)]
    no_symbols: bool,

    /// Drop characters that are easy to misread (l, 1, I, 0, O)
    #[arg(short = 'x', long)]
    exclude_ambiguous: bool,

    /// Print only the result
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
enum Mode {
    Derive,
    Score,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let options = ui::DisplayOptions {
        unicode_support: ui::detect_unicode_support(),
        color_support: ui::detect_color_support(),
        quiet: cli.quiet,
    };

    match cli.mode {
        Mode::Derive => run_derive(&cli, &options),
        Mode::Score => run_score(&options),
    }
}

fn run_derive(cli: &Cli, options: &ui::DisplayOptions) -> Result<()> {
    let service_identifier = ui::prompt_service_identifier()?;
    let (master_secret, master_byte_length, master_char_count) = ui::prompt_master_secret()?;

    let request = DerivationRequest {
        service_identifier: service_identifier.clone(),
        master_secret,
        length: cli.length,
        use_digits: !cli.no_digits,
        use_symbols: !cli.no_symbols,
        exclude_ambiguous: cli.exclude_ambiguous,
    };

    let input_info = ui::InputInfo {
        service_identifier,
        master_byte_length,
        master_char_count,
    };

    let output_config = ui::OutputConfig {
        password_length: request.length,
        alphabet_size: alphabet::build(
            request.use_digits,
            request.use_symbols,
            request.exclude_ambiguous,
        )
        .len(),
    };

    let (password, elapsed) = ui::show_progress(options.unicode_support, || {
        Ok(generator::derive(&request)?)
    })?;

    let report = strength::score(&password);

    ui::display_output(&password, &input_info, &output_config, &report, elapsed, options);

    Ok(())
}

fn run_score(options: &ui::DisplayOptions) -> Result<()> {
    let candidate = ui::prompt_candidate_password()?;
    let report = strength::score(&candidate);

    ui::display_strength(&report, options);

    Ok(())
}
