use std::error::Error;
use std::fs;

use clap::Parser;
use simple_error::bail;

mod boards;
mod input;
mod inout;
mod output;
mod types;

#[derive(Debug, Parser)]
#[command(about = "Generate IO settings test designs (Verilog + PCF + JSON manifest)")]
struct Args {
    /// Target board.
    #[arg(long)]
    board: String,
    /// Generation mode.
    #[arg(long)]
    mode: String,
    /// IOSTANDARD common to all generated buffers.
    #[arg(long)]
    iostandard: String,
    /// DRIVE value(s); 0 leaves the attribute off.
    #[arg(long, num_args = 1..)]
    drive: Vec<u32>,
    /// SLEW value(s).
    #[arg(long, num_args = 1..)]
    slew: Vec<String>,
    /// IN_TERM value(s).
    #[arg(long = "in_term", num_args = 1..)]
    in_term: Vec<String>,
    /// Base name for the output files.
    #[arg(short = 'o')]
    out: String,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Mode {
    Output,
    Input,
    InOut,
    DiffOutput,
    DiffInput,
    DiffInOut,
}

impl Mode {
    fn from_arg(mode: &str) -> Result<Mode, Box<dyn Error>> {
        Ok(match mode {
            "output" => Mode::Output,
            "input" => Mode::Input,
            "inout" => Mode::InOut,
            "diff_output" => Mode::DiffOutput,
            "diff_input" => Mode::DiffInput,
            "diff_inout" => Mode::DiffInOut,
            _ => bail!("unknown generation mode '{}'", mode),
        })
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let Some(board) = boards::get_board(&args.board) else {
        bail!("unknown board '{}'", args.board);
    };

    let fixture = match Mode::from_arg(&args.mode)? {
        Mode::Output => {
            output::generate_output(board, &args.iostandard, &args.drive, &args.slew)?
        }
        Mode::Input => input::generate_input(board, &args.iostandard, &args.in_term)?,
        Mode::InOut => inout::generate_inout(board, &args.iostandard, &args.drive, &args.slew)?,
        Mode::DiffOutput => {
            output::generate_diff_output(board, &args.iostandard, &args.drive, &args.slew)?
        }
        Mode::DiffInput => input::generate_diff_input(board, &args.iostandard, &args.in_term)?,
        Mode::DiffInOut => {
            inout::generate_diff_inout(board, &args.iostandard, &args.drive, &args.slew)?
        }
    };

    fs::write(format!("{}.v", args.out), &fixture.verilog)?;
    fs::write(format!("{}.pcf", args.out), &fixture.pcf)?;
    fs::write(format!("{}.json", args.out), fixture.iosettings.to_json())?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn test_mode_from_arg() {
        assert_matches!(Mode::from_arg("output"), Ok(Mode::Output));
        assert_matches!(Mode::from_arg("input"), Ok(Mode::Input));
        assert_matches!(Mode::from_arg("inout"), Ok(Mode::InOut));
        assert_matches!(Mode::from_arg("diff_output"), Ok(Mode::DiffOutput));
        assert_matches!(Mode::from_arg("diff_input"), Ok(Mode::DiffInput));
        assert_matches!(Mode::from_arg("diff_inout"), Ok(Mode::DiffInOut));
        let err = Mode::from_arg("bidir").unwrap_err();
        assert!(err.to_string().contains("bidir"));
    }
}
