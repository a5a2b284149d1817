//! Rank catalog suggestions.

use anyhow::Result;
use console::style;
use totsy_commerce::catalog::Product;
use totsy_commerce::suggest::SuggestionQuery;

use super::SuggestArgs;
use crate::context::Context;
use crate::output::{format_price, format_score};

/// Run the suggest command.
pub async fn run(args: SuggestArgs, ctx: &Context) -> Result<()> {
    let catalog = ctx.catalog()?;
    let query = SuggestionQuery::new()
        .with_location(args.location.as_str())
        .with_due_date(args.due_date.as_str())
        .with_terms_raw(&args.terms);

    ctx.logger
        .debug_builder("ranking catalog")
        .field_i64("products", catalog.len() as i64)
        .field("terms", query.normalized_terms().join(","))
        .emit();

    let suggestions = ctx.ranker().suggest(&catalog, &query);
    let top_n = args.top.unwrap_or(ctx.config.ranking.top_n);

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "query": query,
            "top": suggestions.top(top_n),
            "more": suggestions.more(top_n),
        }));
        return Ok(());
    }

    if suggestions.is_empty() {
        ctx.output.info("The catalog is empty.");
        return Ok(());
    }

    ctx.output.header("Top picks");
    print_table(ctx, suggestions.top(top_n), true);

    let more = suggestions.more(top_n);
    if more.is_empty() {
        return Ok(());
    }

    if args.all {
        ctx.output.header("More suggestions");
        print_table(ctx, more, false);
    } else {
        ctx.output.line("");
        ctx.output
            .info(&format!("{} more suggestions (use --all to show)", more.len()));
    }

    Ok(())
}

fn print_table(ctx: &Context, products: &[Product], highlight: bool) {
    let rows: Vec<Vec<String>> = products
        .iter()
        .map(|product| {
            let score = format_score(product.score);
            let score = if highlight {
                style(score).green().bold().to_string()
            } else {
                score
            };
            vec![
                product.id.to_string(),
                product.name.clone(),
                product.brand.clone(),
                format_price(product.price),
                score,
            ]
        })
        .collect();

    ctx.output
        .table(&["ID", "NAME", "BRAND", "PRICE", "SCORE"], &rows);
}
