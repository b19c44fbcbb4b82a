//! pickerkit - drive the date and time pickers from the command line.
//!
//! This crate is the *composition root*: it loads configuration, wires the
//! system clock and notification channel into the pickers and prints what a
//! widget would render.

mod cli;
mod run;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    run::run().await
}
