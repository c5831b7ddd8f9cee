//! resonator form - describe the inputs.

use anyhow::Result;
use app_bridge::{FormSchema, FormState};
use colored::Colorize;
use serde::Serialize;

use crate::{output, Cli, OutputFormat};

#[derive(Serialize)]
struct FormOutput<'a> {
    schema: FormSchema,
    values: &'a resonator_types::ResonatorParams,
}

pub fn run(form: &FormState, cli: &Cli) -> Result<()> {
    let schema = FormSchema::standard();
    match cli.format {
        OutputFormat::Json => output::print_json(&FormOutput {
            schema,
            values: form.params(),
        })?,
        OutputFormat::Text if !cli.quiet => {
            println!(
                "{} (shape: {})",
                "Form".bold().underline(),
                form.shape().label()
            );
            for spec in &schema.fields {
                let decimals = spec.decimals as usize;
                println!(
                    "  {:<28} {:>10.*} {:<3} [{} .. {}, step {}]",
                    spec.label.cyan(),
                    decimals,
                    form.get(spec.field),
                    spec.suffix,
                    spec.min,
                    spec.max,
                    spec.step
                );
            }
        }
        OutputFormat::Text => {}
    }
    Ok(())
}
