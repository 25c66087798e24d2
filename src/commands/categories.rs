// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{CategoryPatch, NewCategory, TransactionKind};
use crate::persistence::Slot;
use crate::store::Ledger;
use crate::utils::{
    current_user_id, ensure_unique_name, maybe_print_json, optional_text, pretty_table,
    require_text, resolve_category,
};
use anyhow::Result;

pub fn handle<S: Slot>(ledger: &mut Ledger<S>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = require_text("name", sub.get_one::<String>("name"))?;
            ensure_unique_name("Category", &name, existing_names(ledger), None)?;
            let kind = match sub.get_one::<String>("type") {
                Some(t) => t.parse::<TransactionKind>()?,
                None => TransactionKind::Expense,
            };
            let user_id = current_user_id(ledger)?;
            let category = ledger.add_category(NewCategory {
                name,
                color: optional_text(sub.get_one::<String>("color")).unwrap_or_default(),
                icon: optional_text(sub.get_one::<String>("icon")).unwrap_or_default(),
                kind,
                user_id,
            })?;
            println!(
                "Added category '{}' ({}) id {}",
                category.name, category.kind, category.id
            );
        }
        Some(("list", sub)) => {
            let json_flag = sub.get_flag("json");
            let jsonl_flag = sub.get_flag("jsonl");
            let kind = optional_text(sub.get_one::<String>("type"))
                .map(|t| t.parse::<TransactionKind>())
                .transpose()?;
            let mut cats: Vec<_> = ledger
                .categories()
                .filter(|c| kind.is_none_or(|k| c.kind == k))
                .collect();
            cats.sort_by(|a, b| a.kind.as_str().cmp(b.kind.as_str()).then(a.name.cmp(&b.name)));
            if !maybe_print_json(json_flag, jsonl_flag, &cats)? {
                let data = cats
                    .iter()
                    .map(|c| {
                        vec![
                            c.id.to_string(),
                            format!("{} {}", c.icon, c.name).trim().to_string(),
                            c.kind.to_string(),
                            c.display_color().to_string(),
                            ledger.transactions_by_category(c.id).len().to_string(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["ID", "Category", "Type", "Color", "Transactions"], data)
                );
            }
        }
        Some(("edit", sub)) => {
            let id = resolve_category(ledger, sub.get_one::<String>("id").unwrap())?.id;
            let name = optional_text(sub.get_one::<String>("name"));
            if let Some(n) = &name {
                ensure_unique_name("Category", n, existing_names(ledger), Some(id))?;
            }
            let patch = CategoryPatch {
                name,
                kind: optional_text(sub.get_one::<String>("type"))
                    .map(|t| t.parse::<TransactionKind>())
                    .transpose()?,
                color: optional_text(sub.get_one::<String>("color")),
                icon: sub.get_one::<String>("icon").map(|s| s.trim().to_string()),
            };
            ledger.update_category(id, patch)?;
            println!("Updated category {}", id);
        }
        Some(("rm", sub)) => {
            let id = resolve_category(ledger, sub.get_one::<String>("id").unwrap())?.id;
            if let Some(removed) = ledger.delete_category(id)? {
                println!("Removed category '{}'", removed.name);
            }
        }
        _ => {}
    }
    Ok(())
}

fn existing_names<S: Slot>(ledger: &Ledger<S>) -> impl Iterator<Item = (uuid::Uuid, &str)> {
    ledger.categories().map(|c| (c.id, c.name.as_str()))
}
