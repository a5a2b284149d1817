//! Build and decode pick share links.

use anyhow::{bail, Context as _, Result};
use totsy_commerce::catalog::Catalog;
use totsy_commerce::ids::ProductId;
use totsy_commerce::share::{PickBoard, PickStatus, ShareMode, SharePayload};

use super::{ShareArgs, ShareCommand, ShareLinkArgs};
use crate::context::Context;
use crate::error::LookupError;
use crate::output::{format_price, status_badge};

/// Run the share command.
pub async fn run(args: ShareArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ShareCommand::Link(args) => build_link(args, ctx),
        ShareCommand::Decode { url } => decode_link(&url, ctx),
    }
}

fn build_link(args: ShareLinkArgs, ctx: &Context) -> Result<()> {
    let catalog = ctx.catalog()?;
    let mode: ShareMode = args.mode.parse().map_err(anyhow::Error::msg)?;
    let board = build_board(&catalog, &args)?;

    let payload = SharePayload::from_board(&board, mode).with_query(
        &args.location,
        &args.due_date,
        &args.terms,
    );
    if mode == ShareMode::Voting && payload.picks.is_empty() {
        ctx.output
            .warn("Voting links only carry selected picks; none were selected (use --select)");
    }

    let base = args
        .base_url
        .as_deref()
        .unwrap_or(&ctx.config.share.base_url);
    let url = payload.share_url(base).context("Failed to encode share link")?;

    ctx.logger
        .info_builder("share link built")
        .field("mode", mode.to_string())
        .field_i64("picks", payload.picks.len() as i64)
        .field_i64("url_len", url.len() as i64)
        .emit();

    if ctx.output.is_json() {
        ctx.output
            .json(&serde_json::json!({ "url": url, "payload": payload }));
    } else {
        ctx.output.line(&url);
    }

    Ok(())
}

/// Apply picks, selections, statuses and co-owners in argument order.
fn build_board(catalog: &Catalog, args: &ShareLinkArgs) -> Result<PickBoard> {
    let mut board = PickBoard::new();

    for id in &args.picks {
        let product = catalog
            .get(&ProductId::new(id.as_str()))
            .ok_or_else(|| LookupError::ProductNotFound(id.clone()))?;
        board.add(product);
    }

    for id in &args.selected {
        if !board.toggle_selected(&ProductId::new(id.as_str())) {
            bail!("Cannot select {}: it is not one of the picks", id);
        }
    }

    for entry in &args.statuses {
        let (id, status) = parse_status(entry)?;
        if !board.set_status(&ProductId::new(id), status) {
            bail!("Cannot set status of {}: it is not one of the picks", id);
        }
    }

    for owner in &args.co_owners {
        board.add_co_owner(owner);
    }

    Ok(board)
}

/// Parse `id=status`.
fn parse_status(entry: &str) -> Result<(&str, PickStatus)> {
    let Some((id, status)) = entry.split_once('=') else {
        bail!("Expected id=status, got '{}'", entry);
    };
    let status: PickStatus = status.trim().parse().map_err(anyhow::Error::msg)?;
    Ok((id.trim(), status))
}

fn decode_link(url: &str, ctx: &Context) -> Result<()> {
    let trimmed = url.trim();
    let payload = if trimmed.contains('?') {
        SharePayload::from_url(trimmed)
    } else {
        SharePayload::from_query(trimmed.trim_start_matches('?'))
    };

    let Some(payload) = payload else {
        ctx.logger
            .warn_builder("share link could not be decoded")
            .field_i64("len", trimmed.len() as i64)
            .emit();
        bail!("No share data found in link");
    };

    if ctx.output.is_json() {
        ctx.output.json(&payload);
        return Ok(());
    }

    ctx.output
        .header(&format!("Shared picks ({})", payload.mode));
    let query = payload.query();
    if !query.location.is_empty() {
        ctx.output.kv("location", &query.location);
    }
    if query.has_due_date() {
        ctx.output.kv("due date", &query.due_date);
    }
    if !query.terms.is_empty() {
        ctx.output.kv("terms", &query.normalized_terms().join(", "));
    }

    let board = payload.to_board();
    if !board.co_owners().is_empty() {
        ctx.output.kv("co-owners", &board.co_owners().join(", "));
    }

    ctx.output.line("");
    if board.is_empty() {
        ctx.output.info("No picks in this link.");
        return Ok(());
    }
    for pick in board.picks() {
        let marker = if pick.selected { "*" } else { " " };
        ctx.output.list_item(&format!(
            "{} {} ({}) {} [{}]",
            marker,
            pick.product.name,
            pick.product.brand,
            format_price(pick.product.price),
            status_badge(pick.status),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link_args(picks: &[&str]) -> ShareLinkArgs {
        ShareLinkArgs {
            picks: picks.iter().map(|p| p.to_string()).collect(),
            selected: Vec::new(),
            statuses: Vec::new(),
            co_owners: Vec::new(),
            mode: "registry".to_string(),
            location: String::new(),
            due_date: String::new(),
            terms: String::new(),
            base_url: None,
        }
    }

    #[test]
    fn test_parse_status() {
        let (id, status) = parse_status("stroller-city = Ordered").unwrap();
        assert_eq!(id, "stroller-city");
        assert_eq!(status, PickStatus::Ordered);

        assert!(parse_status("stroller-city").is_err());
        assert!(parse_status("stroller-city=lost").is_err());
    }

    #[test]
    fn test_build_board_applies_flags() {
        let catalog = Catalog::builtin();
        let mut args = link_args(&["stroller-city", "stroller-uppa"]);
        args.selected = vec!["stroller-uppa".to_string()];
        args.statuses = vec!["stroller-city=received".to_string()];
        args.co_owners = vec!["Sam".to_string(), " Sam ".to_string()];

        let board = build_board(&catalog, &args).unwrap();
        assert_eq!(board.len(), 2);
        assert_eq!(
            board.get(&ProductId::new("stroller-city")).unwrap().status,
            PickStatus::Received
        );
        assert_eq!(board.selected().count(), 1);
        assert_eq!(board.co_owners(), ["Sam".to_string()]);
    }

    #[test]
    fn test_build_board_rejects_unknown_ids() {
        let catalog = Catalog::builtin();
        assert!(build_board(&catalog, &link_args(&["nope"])).is_err());

        let mut args = link_args(&["stroller-city"]);
        args.selected = vec!["stroller-uppa".to_string()];
        assert!(build_board(&catalog, &args).is_err());
    }
}
