//! The `bv` command: boolean algebra on bit vectors.

use anyhow::{Context, Result};
use std::io::{BufWriter, Write};
use std::path::Path;

use super::args::BvArgs;
use readshare::bitvec::BitVector;

fn read_vector(path: &Path) -> Result<BitVector> {
    BitVector::read(path).with_context(|| format!("Failed to read bit vector {}", path.display()))
}

/// Comment line and selected-read count of a vector.
pub fn describe(bv: &BitVector) -> String {
    format!(
        "{}\nReads:\n  {} / {} reads selected\n",
        bv.comment(),
        bv.count_ones(),
        bv.len()
    )
}

/// Apply the requested operation, returning `None` when none was given.
fn apply_operation(args: &BvArgs, bv: &mut BitVector) -> Result<Option<String>> {
    let input = args.input.display();
    let comment = if args.not {
        bv.not();
        format!("NOT {}", input)
    } else if let Some(other) = &args.and {
        bv.and(&read_vector(other)?)?;
        format!("{} AND {}", input, other.display())
    } else if let Some(other) = &args.or {
        bv.or(&read_vector(other)?)?;
        format!("{} OR {}", input, other.display())
    } else if let Some(other) = &args.and_not {
        bv.and_not(&read_vector(other)?)?;
        format!("{} AND (NOT {})", input, other.display())
    } else {
        return Ok(None);
    };
    Ok(Some(comment))
}

pub fn run_bv(args: &BvArgs) -> Result<()> {
    let mut bv = read_vector(&args.input)?;
    let comment = apply_operation(args, &mut bv)
        .with_context(|| format!("Bit vector operation on {} failed", args.input.display()))?;

    // The vector keeps its input comment until written.
    let to_stdout = comment.is_some() && args.output.is_none();
    if args.info {
        if to_stdout {
            eprint!("{}", describe(&bv));
        } else {
            print!("{}", describe(&bv));
        }
    }

    let Some(comment) = comment else {
        return Ok(());
    };
    bv.set_comment(comment);
    match &args.output {
        Some(path) => bv
            .write(path)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => {
            let stdout = std::io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            bv.write_to(&mut writer)?;
            writer.flush()?;
        }
    }
    Ok(())
}
