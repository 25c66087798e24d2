// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{get_default_currency, optional_text, parse_currency, set_default_currency};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("currency", sub)) => match optional_text(sub.get_one::<String>("code")) {
            Some(code) => {
                let code = parse_currency(&code)?;
                set_default_currency(conn, &code)?;
                println!("Default currency set to {}", code);
            }
            None => println!("{}", get_default_currency(conn)?),
        },
        _ => {}
    }
    Ok(())
}
