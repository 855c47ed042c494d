//! Encode and decode commands for inline-source URL tokens.

use std::io::Read;
use std::path::Path;

use fiddle_core::codec;

/// Print the token for a source file, or for stdin.
pub fn encode(file: Option<&Path>) -> anyhow::Result<()> {
    let source = match file {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {}: {}", path.display(), e))?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    println!("{}", codec::encode(&source));
    Ok(())
}

/// Print the source carried by a token.
pub fn decode(token: &str) -> anyhow::Result<()> {
    match codec::decode(token) {
        Some(source) => {
            print!("{}", source);
            Ok(())
        }
        None => anyhow::bail!("Invalid source token"),
    }
}
