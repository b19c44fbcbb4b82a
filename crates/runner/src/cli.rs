//! Command-line parsing.

use anyhow::{bail, Context};

pub const USAGE: &str = "Usage: pickerkit <command> [options]

Commands:
  date <text>        Parse date input
  time <text>        Parse time input
  grid [YYYY-MM]     Print a month grid (default: the model's month)
  slots              Print the time slot list

Options:
  --model <iso>      Current model value (RFC 3339 or YYYY-MM-DD)
  --min <iso>        Lower bound
  --max <iso>        Upper bound
  --timezone <id>    Timezone, overriding PICKER_TIMEZONE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Date(String),
    Time(String),
    /// `month` is 0-based.
    Grid(Option<(i32, u32)>),
    Slots,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub command: Command,
    pub model: Option<String>,
    pub min: Option<String>,
    pub max: Option<String>,
    pub timezone: Option<String>,
}

impl Invocation {
    pub fn parse<I>(args: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut model = None;
        let mut min = None;
        let mut max = None;
        let mut timezone = None;
        let mut positional = Vec::new();

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            let slot = match arg.as_str() {
                "--model" => &mut model,
                "--min" => &mut min,
                "--max" => &mut max,
                "--timezone" => &mut timezone,
                "-h" | "--help" => bail!("{USAGE}"),
                flag if flag.starts_with("--") => bail!("Unknown option: {flag}\n\n{USAGE}"),
                _ => {
                    positional.push(arg);
                    continue;
                }
            };
            let value = args
                .next()
                .with_context(|| format!("{arg} needs a value"))?;
            *slot = Some(value);
        }

        let mut positional = positional.into_iter();
        let command = match positional.next().as_deref() {
            Some("date") => Command::Date(positional.next().context("date needs input text")?),
            Some("time") => Command::Time(positional.next().context("time needs input text")?),
            Some("grid") => Command::Grid(positional.next().map(|m| parse_month(&m)).transpose()?),
            Some("slots") => Command::Slots,
            Some(cmd) => bail!("Unknown command: {cmd}\n\n{USAGE}"),
            None => bail!("{USAGE}"),
        };
        if let Some(extra) = positional.next() {
            bail!("Unexpected argument: {extra}");
        }

        Ok(Self {
            command,
            model,
            min,
            max,
            timezone,
        })
    }
}

/// `YYYY-MM` with a 1-based month, returned as `(year, 0-based month)`.
fn parse_month(raw: &str) -> anyhow::Result<(i32, u32)> {
    let (year, month) = raw
        .split_once('-')
        .with_context(|| format!("month must look like YYYY-MM, got '{raw}'"))?;
    let year: i32 = year
        .parse()
        .with_context(|| format!("bad year in '{raw}'"))?;
    let month: u32 = month
        .parse()
        .with_context(|| format!("bad month in '{raw}'"))?;
    if !(1..=12).contains(&month) {
        bail!("month must be 01-12, got '{raw}'");
    }
    Ok((year, month - 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> anyhow::Result<Invocation> {
        Invocation::parse(args.iter().map(|a| a.to_string()))
    }

    #[test]
    fn date_with_options() {
        let inv = parse(&["date", "1/12/2024", "--min", "2024-01-10", "--timezone", "UTC"]).unwrap();
        assert_eq!(inv.command, Command::Date("1/12/2024".to_string()));
        assert_eq!(inv.min.as_deref(), Some("2024-01-10"));
        assert_eq!(inv.timezone.as_deref(), Some("UTC"));
        assert!(inv.max.is_none());
    }

    #[test]
    fn grid_month_is_zero_based() {
        assert_eq!(parse(&["grid", "2024-01"]).unwrap().command, Command::Grid(Some((2024, 0))));
        assert_eq!(parse(&["grid"]).unwrap().command, Command::Grid(None));
        assert!(parse(&["grid", "2024-13"]).is_err());
        assert!(parse(&["grid", "January"]).is_err());
    }

    #[test]
    fn rejects_bad_invocations() {
        assert!(parse(&[]).is_err());
        assert!(parse(&["dance"]).is_err());
        assert!(parse(&["date"]).is_err());
        assert!(parse(&["slots", "--model"]).is_err());
        assert!(parse(&["slots", "--colour", "red"]).is_err());
        assert!(parse(&["slots", "extra"]).is_err());
    }
}
