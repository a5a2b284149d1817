//! Generate a categorized list from a free-text request.

use std::time::Instant;

use anyhow::{bail, Result};
use totsy_commerce::generation::GeneratedList;
use totsy_commerce::lists::{NewItem, NewList};

use super::GenerateArgs;
use crate::context::Context;
use crate::output::format_price;

/// Run the generate command.
pub async fn run(args: GenerateArgs, ctx: &Context) -> Result<()> {
    if args.input.trim().is_empty() {
        bail!("Tell me what you are looking for");
    }

    let generator = ctx.generator(args.response_file.as_deref());

    let start = Instant::now();
    let spinner = ctx.output.spinner("Generating list...");
    let outcome = generator.generate_list(&args.input);
    spinner.finish_and_clear();

    ctx.logger
        .info_builder("generate command finished")
        .field_bool("generated", outcome.is_generated())
        .duration_ms("elapsed_ms", start.elapsed())
        .emit();

    if let Some(error) = outcome.error() {
        ctx.output.warn(&format!("Generation failed: {}", error));
    }

    let list = outcome.list();
    let saved = match args.save_as {
        Some(ref name) if outcome.is_generated() => {
            Some(save_list(list, name, args.public, args.essentials_only, ctx)?)
        }
        Some(_) => {
            ctx.output.warn("Nothing generated, so no list was saved");
            None
        }
        None => None,
    };

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "generated": outcome.is_generated(),
            "error": outcome.error().map(|e| e.to_string()),
            "list": list,
            "savedList": saved,
        }));
        return Ok(());
    }

    print_generated(list, ctx);

    if let Some(id) = saved {
        ctx.output.line("");
        ctx.output.success(&format!("Saved as list {}", id));
    }

    Ok(())
}

fn save_list(
    list: &GeneratedList,
    name: &str,
    public: bool,
    essentials_only: bool,
    ctx: &Context,
) -> Result<String> {
    let items: Vec<NewItem> = if essentials_only {
        list.essentials()
            .flat_map(|block| block.items.iter().map(NewItem::from))
            .collect()
    } else {
        list.saved_items()
    };

    let store = ctx.open_store()?;
    let id = store.create_list(
        NewList::new(name)
            .with_description(list.summary.due_date.clone())
            .public(public)
            .with_author(ctx.config.profile.author.clone()),
    );
    for item in items {
        store.add_item(&id, item);
    }

    Ok(id.into_inner())
}

fn print_generated(list: &GeneratedList, ctx: &Context) {
    ctx.output.header("Summary");
    if !list.summary.due_date.is_empty() {
        ctx.output.kv("timing", &list.summary.due_date);
    }
    ctx.output.kv("budget", &list.summary.budget.to_string());
    if !list.summary.key_prefs.is_empty() {
        ctx.output.kv("preferences", &list.summary.key_prefs.join(", "));
    }
    for disclaimer in &list.summary.disclaimers {
        ctx.output.warn(disclaimer);
    }

    for block in &list.categories {
        ctx.output
            .header(&format!("{} ({})", block.category, block.priority));

        for item in &block.items {
            let mut line = item.name.clone();
            if let Some(ref brand) = item.brand {
                line.push_str(&format!(" ({})", brand));
            }
            if let Some(price) = item.est_price_usd {
                line.push_str(&format!(" {}", format_price(price)));
            }
            if item.eco_friendly {
                line.push_str(" eco");
            }
            ctx.output.list_item(&line);
            ctx.output.line(&format!("      {}", item.why));
        }
    }
}
