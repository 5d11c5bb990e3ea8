//! Stage listing and information command.

#![allow(clippy::print_literal)] // Table headers use literal strings intentionally

use clap::Args;
use stemfx_core::StageId;
use stemfx_engine::{approximations, renderer_type};
use stemfx_registry::descriptor;

#[derive(Args)]
pub struct StagesArgs {
    /// Show details for a specific stage
    #[arg(value_name = "STAGE")]
    stage: Option<String>,
}

pub fn run(args: StagesArgs) -> anyhow::Result<()> {
    match &args.stage {
        Some(name) => {
            let id: StageId = name.parse()?;
            print_stage(id);
        }
        None => print_chain(),
    }
    Ok(())
}

fn print_chain() {
    println!("Signal Chain");
    println!("============");
    println!();

    for (position, id) in StageId::SIGNAL_ORDER.iter().enumerate() {
        let desc = descriptor(*id);
        println!(
            "  {:2}. {:12} {:18} - {}",
            position + 1,
            id.as_str(),
            renderer_type(*id),
            desc.description
        );
    }

    println!();
    println!("Use 'stemfx stages <stage>' for detailed parameter info.");
}

fn print_stage(id: StageId) {
    let desc = descriptor(id);

    println!("{} ({})", desc.name, id);
    println!("{}", "=".repeat(desc.name.len() + id.as_str().len() + 3));
    println!();
    println!("{}", desc.description);
    println!();
    println!("  Kind:      {}", desc.kind());
    println!("  Category:  {}", desc.category().name());
    println!("  Exports:   {}", renderer_type(id));
    println!();

    println!("Parameters:");
    println!();
    println!("  {:16}  {:12}  {}", "Name", "Default", "Range");
    println!("  {:16}  {:12}  {}", "----", "-------", "-----");
    for param in desc.params {
        println!(
            "  {:16}  {:12}  {} .. {}",
            param.name,
            param.format_value(param.default),
            param.format_value(param.min),
            param.format_value(param.max)
        );
    }

    let notes: Vec<_> = approximations().iter().filter(|a| a.stage == id).collect();
    if !notes.is_empty() {
        println!();
        println!("Export approximations:");
        for note in notes {
            println!("  - {}", note.description);
        }
    }
}
