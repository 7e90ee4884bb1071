//! Command-line parsing.

use std::path::PathBuf;

use anyhow::{anyhow, bail, Result};

pub const USAGE: &str = "\
Usage:
  dram classify <image>
  dram gallery <catalog.json> [search terms] [--type <spirit type>] [--select <id>]

Environment:
  CLASSIFIER_URL           classification endpoint (default http://localhost:5000/api/search)
  CLASSIFIER_TIMEOUT_SECS  request timeout in seconds (default: none)
  MAX_IMAGE_BYTES          largest accepted image (default 5242880)
  LOG_FORMAT=json          JSON logs on stderr";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Classify {
        image: PathBuf,
    },
    Gallery {
        catalog: PathBuf,
        search: String,
        spirit_type: Option<String>,
        select: Option<u64>,
    },
    Help,
}

/// Parse arguments, excluding the program name.
pub fn parse<I>(args: I) -> Result<Command>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let Some(sub) = args.next() else {
        return Ok(Command::Help);
    };

    match sub.as_str() {
        "classify" => {
            let image = args
                .next()
                .ok_or_else(|| anyhow!("classify: missing <image>"))?;
            if let Some(extra) = args.next() {
                bail!("classify: unexpected argument {:?}", extra);
            }
            Ok(Command::Classify {
                image: PathBuf::from(image),
            })
        }
        "gallery" => {
            let catalog = args
                .next()
                .ok_or_else(|| anyhow!("gallery: missing <catalog.json>"))?;
            let mut terms = Vec::new();
            let mut spirit_type = None;
            let mut select = None;

            while let Some(arg) = args.next() {
                match arg.as_str() {
                    "--type" => {
                        spirit_type =
                            Some(args.next().ok_or_else(|| anyhow!("--type needs a value"))?);
                    }
                    "--select" => {
                        let raw = args.next().ok_or_else(|| anyhow!("--select needs an id"))?;
                        select = Some(
                            raw.parse::<u64>()
                                .map_err(|_| anyhow!("--select: {:?} is not an id", raw))?,
                        );
                    }
                    _ => terms.push(arg),
                }
            }

            Ok(Command::Gallery {
                catalog: PathBuf::from(catalog),
                search: terms.join(" "),
                spirit_type,
                select,
            })
        }
        "help" | "-h" | "--help" => Ok(Command::Help),
        other => bail!("unknown command {:?}", other),
    }
}
