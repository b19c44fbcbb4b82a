use std::sync::Arc;

use anyhow::{Context, Result};
use serde_json::{json, Value};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pickerkit_domain::{TemporalValue, Zone};
use pickerkit_engine::{
    ChangeNotifier, ClockPort, DatePicker, PickerConfig, SystemClock, TimePicker,
    TimezoneResolver,
};

use crate::cli::{Command, Invocation};

pub async fn run() -> Result<()> {
    load_dotenv_from_repo_root();

    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pickerkit_engine=debug,pickerkit_runner=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let invocation = Invocation::parse(std::env::args().skip(1))?;

    let mut config = PickerConfig::from_env().context("loading PICKER_* configuration")?;
    if let Some(timezone) = invocation.timezone.clone() {
        config.timezone = Some(timezone);
    }
    tracing::info!(
        date_format = %config.date_format,
        time_format = %config.time_format,
        interval_minutes = config.interval_minutes,
        timezone = ?config.timezone,
        "Starting pickerkit"
    );

    let clock: Arc<dyn ClockPort> = Arc::new(SystemClock::new());
    let (notifier, mut changes) = ChangeNotifier::channel();

    // Pickers hold the only senders; the channel closes when they drop.
    let report = execute(&invocation, &config, clock, notifier)?;

    println!("{}", serde_json::to_string_pretty(&report)?);

    while let Some(change) = changes.recv().await {
        tracing::info!(source = %change.source, value = %change.value, "Model changed");
    }

    Ok(())
}

fn execute(
    invocation: &Invocation,
    config: &PickerConfig,
    clock: Arc<dyn ClockPort>,
    notifier: ChangeNotifier,
) -> Result<Value> {
    let resolver = TimezoneResolver::new(config.wants_timezone());
    let zone = resolver.resolve(config.timezone.as_deref());
    let model = parse_model(invocation.model.as_deref(), zone)?;
    let model = model.as_ref();

    let report = match &invocation.command {
        Command::Date(text) => {
            let mut picker = DatePicker::with_resolver(config, model, clock, notifier, resolver)?;
            apply_bounds(&mut picker, invocation, model);
            if model.is_some() {
                picker.format_model(model);
            }
            let commit = picker.parse_input(text);
            json!({
                "input": text,
                "committed": commit.committed,
                "value": commit.value.to_string(),
                "text": picker.text(),
                "validity": commit.validity,
            })
        }
        Command::Time(text) => {
            let mut picker = TimePicker::with_resolver(config, model, clock, notifier, resolver)?;
            if model.is_some() {
                picker.format_model(model);
            }
            let commit = picker.parse_input(text);
            json!({
                "input": text,
                "committed": commit.committed,
                "value": commit.value.to_string(),
                "text": picker.text(),
                "validity": commit.validity,
            })
        }
        Command::Grid(month) => {
            let mut picker = DatePicker::with_resolver(config, model, clock, notifier, resolver)?;
            let validity = apply_bounds(&mut picker, invocation, model);
            let grid = match month {
                Some((year, month)) => picker.build_month(*year, *month, model)?,
                None => picker.open(model)?,
            };
            json!({
                "zone": picker.zone().to_string(),
                "dayNames": picker.day_names(),
                "grid": grid,
                "validity": validity,
            })
        }
        Command::Slots => {
            let picker = TimePicker::with_resolver(config, model, clock, notifier, resolver)?;
            json!({
                "zone": picker.zone().to_string(),
                "intervalMinutes": picker.interval_minutes(),
                "slots": picker.time_slots(),
            })
        }
    };

    Ok(report)
}

fn parse_model(raw: Option<&str>, zone: Zone) -> Result<Option<TemporalValue>> {
    raw.map(|raw| {
        TemporalValue::parse_iso(raw, zone).with_context(|| format!("--model '{raw}' is not a timestamp"))
    })
    .transpose()
}

fn apply_bounds(
    picker: &mut DatePicker,
    invocation: &Invocation,
    model: Option<&TemporalValue>,
) -> pickerkit_domain::Validity {
    picker.set_min_input(invocation.min.as_deref(), model);
    picker.set_max_input(invocation.max.as_deref(), model)
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
    let _ = dotenvy::dotenv();
}
