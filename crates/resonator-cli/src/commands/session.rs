//! resonator session - JSON-lines message loop.
//!
//! The first line written is the initial model; after that every input
//! line gets exactly one reply line.

use std::io::{BufRead, Write};

use anyhow::Result;
use app_bridge::{dispatch_json, App, FormState, ViewerOptions};
use kernel_bridge::TruckKernel;
use tracing::info;

pub fn run(form: FormState) -> Result<()> {
    let mut app = App::with_options(Box::new(TruckKernel::new()), form, ViewerOptions::default());
    let stdin = std::io::stdin();
    let mut out = std::io::stdout().lock();
    serve(&mut app, stdin.lock(), &mut out)
}

fn serve<R: BufRead, W: Write>(app: &mut App, input: R, out: &mut W) -> Result<()> {
    serde_json::to_writer(&mut *out, &app.model_updated())?;
    writeln!(out)?;
    out.flush()?;

    let mut handled = 0usize;
    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let reply = dispatch_json(app, &line);
        serde_json::to_writer(&mut *out, &reply)?;
        writeln!(out)?;
        out.flush()?;
        handled += 1;
    }
    info!(handled, "session closed");
    Ok(())
}
