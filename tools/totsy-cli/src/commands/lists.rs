//! Saved list management.

use anyhow::{bail, Result};
use dialoguer::Confirm;
use totsy_commerce::catalog::Product;
use totsy_commerce::ids::{ItemId, ListId, ProductId};
use totsy_commerce::lists::{ListStore, ListUpdate, NewItem, NewList, UserList, Vote};

use super::{AddItemArgs, ListsArgs, ListsCommand};
use crate::context::Context;
use crate::error::LookupError;
use crate::output::{format_price, format_votes};

/// Run the lists command.
pub async fn run(args: ListsArgs, ctx: &Context) -> Result<()> {
    let store = ctx.open_store()?;

    let output = ctx.output.clone();
    let _saved = store.subscribe(move || output.debug("Lists saved"));

    match args.command.unwrap_or(ListsCommand::List) {
        ListsCommand::List => list_lists(&store, ctx),
        ListsCommand::Show { list } => show_list(&store, &list, ctx),
        ListsCommand::Create {
            name,
            description,
            public,
            author,
        } => create_list(&store, name, description, public, author, ctx),
        ListsCommand::Update {
            list,
            name,
            description,
            clear_description,
            public,
            private,
            author,
        } => {
            let mut update = ListUpdate::new();
            if let Some(name) = name {
                update = update.name(name);
            }
            if let Some(description) = description {
                update = update.description(description);
            }
            if clear_description {
                update = update.clear_description();
            }
            if public || private {
                update = update.public(public);
            }
            if let Some(author) = author {
                update = update.author(author);
            }
            update_list(&store, &list, update, ctx)
        }
        ListsCommand::Delete { list, yes } => delete_list(&store, &list, yes, ctx),
        ListsCommand::AddItem(args) => add_item(&store, args, ctx),
        ListsCommand::RemoveItem { list, item } => remove_item(&store, &list, &item, ctx),
        ListsCommand::Vote { list, item, vote } => {
            let vote: Vote = vote.parse().map_err(anyhow::Error::msg)?;
            vote_item(&store, &list, &item, vote, ctx)
        }
        ListsCommand::Comment {
            list,
            item,
            text,
            author,
        } => comment_item(&store, &list, &item, &text, author.as_deref(), ctx),
        ListsCommand::Shared { code } => show_shared(&store, &code, ctx),
    }
}

fn list_lists(store: &ListStore, ctx: &Context) -> Result<()> {
    let lists = store.lists();

    if ctx.output.is_json() {
        let views: Vec<UserList> = lists.iter().map(UserList::public_view).collect();
        ctx.output.json(&views);
        return Ok(());
    }

    if lists.is_empty() {
        ctx.output
            .info("No lists yet. Create one with `totsy lists create <name>`.");
        return Ok(());
    }

    ctx.output.header("Lists");
    let rows: Vec<Vec<String>> = lists
        .iter()
        .map(|list| {
            vec![
                list.id.to_string(),
                list.name.clone(),
                list.len().to_string(),
                format_price(list.estimated_total()),
                list.share_code().unwrap_or("-").to_string(),
            ]
        })
        .collect();
    ctx.output
        .table(&["ID", "NAME", "ITEMS", "TOTAL", "SHARE"], &rows);

    Ok(())
}

fn show_list(store: &ListStore, id: &str, ctx: &Context) -> Result<()> {
    let list = ctx.require_list(store, id)?;
    print_list(&list, ctx);
    Ok(())
}

fn print_list(list: &UserList, ctx: &Context) {
    if ctx.output.is_json() {
        ctx.output.json(&list.public_view());
        return;
    }

    ctx.output.header(&list.name);
    if let Some(ref description) = list.description {
        ctx.output.line(description);
    }
    ctx.output.kv("id", list.id.as_str());
    ctx.output.kv("author", &list.author);
    ctx.output
        .kv("visibility", if list.is_public { "public" } else { "private" });
    if let Some(path) = list.share_path() {
        ctx.output.kv("share", &path);
    }
    let updated = list.updated_at.with_timezone(&chrono::Local);
    ctx.output
        .kv("updated", &updated.format("%Y-%m-%d %H:%M").to_string());

    if list.is_empty() {
        ctx.output.line("");
        ctx.output.info("No items yet.");
        return;
    }

    ctx.output.line("");
    for item in &list.items {
        let mut line = format!("[{}] {}", item.id, item.name);
        if let Some(ref brand) = item.brand {
            line.push_str(&format!(" ({})", brand));
        }
        if let Some(price) = item.est_price_usd {
            line.push_str(&format!(" {}", format_price(price)));
        }
        if item.eco_friendly {
            line.push_str(" eco");
        }
        line.push_str(&format!("  {}", format_votes(&item.votes)));
        ctx.output.list_item(&line);

        if !item.why.is_empty() {
            ctx.output.line(&format!("      {}", item.why));
        }
        for comment in &item.comments {
            ctx.output
                .line(&format!("      > {}: {}", comment.author, comment.text));
        }
    }
    ctx.output.line("");
    ctx.output
        .kv("estimated total", &format_price(list.estimated_total()));
}

fn create_list(
    store: &ListStore,
    name: String,
    description: Option<String>,
    public: bool,
    author: Option<String>,
    ctx: &Context,
) -> Result<()> {
    if name.trim().is_empty() {
        bail!("List name cannot be empty");
    }

    let mut new = NewList::new(name)
        .public(public)
        .with_author(author.unwrap_or_else(|| ctx.config.profile.author.clone()));
    if let Some(description) = description {
        new = new.with_description(description);
    }

    let id = store.create_list(new);
    let list = ctx.require_list(store, id.as_str())?;

    if ctx.output.is_json() {
        ctx.output.json(&list.public_view());
        return Ok(());
    }

    ctx.output.success(&format!("Created list {} ({})", list.name, id));
    if let Some(path) = list.share_path() {
        ctx.output.kv("share", &path);
    }

    Ok(())
}

fn update_list(store: &ListStore, id: &str, update: ListUpdate, ctx: &Context) -> Result<()> {
    if update.is_empty() {
        bail!("Nothing to update. Pass --name, --description, --public, --private or --author.");
    }

    ctx.require_list(store, id)?;
    store.update_list(&ListId::new(id), update);
    let list = ctx.require_list(store, id)?;

    if ctx.output.is_json() {
        ctx.output.json(&list.public_view());
        return Ok(());
    }

    ctx.output.success(&format!("Updated list {}", list.name));
    if let Some(path) = list.share_path() {
        ctx.output.kv("share", &path);
    }

    Ok(())
}

fn delete_list(store: &ListStore, id: &str, yes: bool, ctx: &Context) -> Result<()> {
    let list = ctx.require_list(store, id)?;

    if !yes && !ctx.output.is_json() {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Delete list '{}' with {} item(s)?",
                list.name,
                list.len()
            ))
            .default(false)
            .interact()?;

        if !confirmed {
            ctx.output.info("Cancelled");
            return Ok(());
        }
    }

    store.delete_list(&list.id);

    if ctx.output.is_json() {
        ctx.output
            .json(&serde_json::json!({ "deleted": list.id }));
    } else {
        ctx.output.success(&format!("Deleted list {}", list.name));
    }

    Ok(())
}

fn add_item(store: &ListStore, args: AddItemArgs, ctx: &Context) -> Result<()> {
    ctx.require_list(store, &args.list)?;

    let item = match (args.product, args.name) {
        (Some(product_id), _) => {
            let catalog = ctx.catalog()?;
            let product: &Product = catalog
                .get(&ProductId::new(product_id.as_str()))
                .ok_or(LookupError::ProductNotFound(product_id))?;
            let mut item = NewItem::from(product);
            if !args.why.is_empty() {
                item.why = args.why;
            }
            item.eco_friendly = args.eco;
            item
        }
        (None, Some(name)) => {
            let mut item = NewItem::new(name, args.why, args.eco);
            if let Some(brand) = args.brand {
                item = item.with_brand(brand);
            }
            if let Some(price) = args.price {
                item = item.with_price(price);
            }
            if let Some(url) = args.url {
                item = item.with_url(url);
            }
            item
        }
        (None, None) => bail!("Pass --product <id> or --name <name>"),
    };

    let name = item.name.clone();
    let item_id = store
        .add_item(&ListId::new(args.list.as_str()), item)
        .ok_or_else(|| LookupError::ListNotFound(args.list.clone()))?;

    if ctx.output.is_json() {
        ctx.output
            .json(&serde_json::json!({ "list": args.list, "item": item_id }));
    } else {
        ctx.output
            .success(&format!("Added {} as item {}", name, item_id));
    }

    Ok(())
}

fn remove_item(store: &ListStore, list: &str, item: &str, ctx: &Context) -> Result<()> {
    ctx.require_item(store, list, item)?;
    store.remove_item(&ListId::new(list), &ItemId::new(item));
    ctx.output.success(&format!("Removed item {}", item));
    Ok(())
}

fn vote_item(store: &ListStore, list: &str, item: &str, vote: Vote, ctx: &Context) -> Result<()> {
    ctx.require_item(store, list, item)?;
    let changed = store.vote(&ListId::new(list), &ItemId::new(item), vote);

    let list = ctx.require_list(store, list)?;
    let votes = list
        .item(&ItemId::new(item))
        .map(|i| i.votes)
        .unwrap_or_default();

    if ctx.output.is_json() {
        ctx.output
            .json(&serde_json::json!({ "changed": changed, "votes": votes }));
    } else if changed {
        ctx.output
            .success(&format!("Voted {}: {}", vote, format_votes(&votes)));
    } else {
        ctx.output
            .info(&format!("Already voted {}: {}", vote, format_votes(&votes)));
    }

    Ok(())
}

fn comment_item(
    store: &ListStore,
    list: &str,
    item: &str,
    text: &str,
    author: Option<&str>,
    ctx: &Context,
) -> Result<()> {
    ctx.require_item(store, list, item)?;

    let Some(comment_id) =
        store.add_comment(&ListId::new(list), &ItemId::new(item), text, author)
    else {
        bail!("Comment text cannot be empty");
    };

    if ctx.output.is_json() {
        ctx.output
            .json(&serde_json::json!({ "comment": comment_id }));
    } else {
        ctx.output.success(&format!("Added comment {}", comment_id));
    }

    Ok(())
}

fn show_shared(store: &ListStore, code: &str, ctx: &Context) -> Result<()> {
    let list = store
        .find_by_share_code(code)
        .ok_or_else(|| LookupError::ShareCodeNotFound(code.to_string()))?;
    print_list(&list, ctx);
    Ok(())
}
