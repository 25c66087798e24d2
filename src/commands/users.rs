// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{NewUser, UserKind, UserPatch};
use crate::persistence::Slot;
use crate::store::Ledger;
use crate::utils::{maybe_print_json, optional_text, pretty_table, require_text};
use anyhow::Result;

pub fn handle<S: Slot>(ledger: &mut Ledger<S>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("login", sub)) => {
            let name = require_text("name", sub.get_one::<String>("name"))?;
            let email = require_text("email", sub.get_one::<String>("email"))?;
            let kind = match sub.get_one::<String>("type") {
                Some(t) => t.parse::<UserKind>()?,
                None => UserKind::Individual,
            };
            let user = ledger.sign_in(NewUser { name, email, kind })?;
            println!("Signed in as {} <{}>", user.name, user.email);
        }
        Some(("show", sub)) => {
            let json_flag = sub.get_flag("json");
            let jsonl_flag = sub.get_flag("jsonl");
            let user = ledger.current_user();
            if !maybe_print_json(json_flag, jsonl_flag, &user)? {
                match user {
                    Some(u) => println!(
                        "{}",
                        pretty_table(
                            &["Name", "E-mail", "Type", "Created", "Updated"],
                            vec![vec![
                                u.name.clone(),
                                u.email.clone(),
                                u.kind.to_string(),
                                u.created_at.format("%Y-%m-%d %H:%M").to_string(),
                                u.updated_at.format("%Y-%m-%d %H:%M").to_string(),
                            ]],
                        )
                    ),
                    None => println!("No user signed in"),
                }
            }
        }
        Some(("update", sub)) => {
            // Name and e-mail stay required: present flags must not be blank.
            let name = match sub.get_one::<String>("name") {
                Some(_) => Some(require_text("name", sub.get_one::<String>("name"))?),
                None => None,
            };
            let email = match sub.get_one::<String>("email") {
                Some(_) => Some(require_text("email", sub.get_one::<String>("email"))?),
                None => None,
            };
            let kind = optional_text(sub.get_one::<String>("type"))
                .map(|t| t.parse::<UserKind>())
                .transpose()?;
            if ledger.update_current_user(UserPatch { name, email, kind })? {
                println!("Profile updated");
            } else {
                println!("No user signed in");
            }
        }
        Some(("logout", _)) => {
            ledger.set_current_user(None)?;
            println!("Signed out");
        }
        _ => {}
    }
    Ok(())
}
