use crate::cli::{actions::Action, globals::GlobalArgs};
use anyhow::Result;
use secrecy::SecretString;

pub fn handler(matches: &clap::ArgMatches) -> Result<(Action, GlobalArgs)> {
    let token_secret = matches
        .get_one::<String>("token-secret")
        .map(|s| SecretString::from(s.clone()))
        .ok_or_else(|| anyhow::anyhow!("missing required argument: --token-secret"))?;

    let action = Action::Server {
        port: matches.get_one::<u16>("port").copied().unwrap_or(8080),
        dsn: matches
            .get_one("dsn")
            .map(|s: &String| s.to_string())
            .ok_or_else(|| anyhow::anyhow!("missing required argument: --dsn"))?,
        production: matches.get_flag("production"),
    };

    Ok((action, GlobalArgs::new(token_secret)))
}
