// SPDX-License-Identifier: MIT

use std::env;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use pgprobackup_fleet::config::load_and_validate_config;
use pgprobackup_fleet::exchange::FileStore;
use pgprobackup_fleet::keys::FileKeyProvider;
use pgprobackup_fleet::node::{run_pass, NodeReport};
use pgprobackup_fleet::platform::RepoSource;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 || args.len() > 4 {
        eprintln!("Usage: {} <config.yaml> <store.json> [home_root]", args[0]);
        eprintln!("Example: {} node.yaml /var/lib/pgbackup/exchange.json", args[0]);
        std::process::exit(1);
    }

    let config = load_and_validate_config(&args[1])
        .with_context(|| format!("loading node config from {}", args[1]))?;
    let mut store =
        FileStore::open(&args[2]).with_context(|| format!("opening resource store {}", args[2]))?;
    let keys = match args.get(3) {
        Some(home_root) => FileKeyProvider::new(home_root),
        None => FileKeyProvider::default(),
    };

    let report = run_pass(&config, &mut store, &keys).context("node pass failed")?;
    print_report(&report);

    Ok(())
}

fn print_report(report: &NodeReport) {
    let (role, fqdn, publish, realized, packages, repo) = match report {
        NodeReport::Instance(r) => {
            ("instance", &r.fqdn, &r.publish, &r.realized, &r.packages, &r.repo)
        }
        NodeReport::Catalog(r) => {
            ("catalog", &r.fqdn, &r.publish, &r.realized, &r.packages, &r.repo)
        }
    };

    println!("{} pass for {}", role, fqdn);
    println!(
        "  published: {} created, {} replaced, {} unchanged",
        publish.created, publish.replaced, publish.unchanged
    );
    println!(
        "  realize: {} authorized key(s), {} cron entr(ies), {} one-shot command(s)",
        realized.authorized_keys.len(),
        realized.cron_entries.len(),
        realized.one_shot_commands.len()
    );
    for key in &realized.authorized_keys {
        println!("    key {} for {}", key.name, key.user);
    }
    for cron in &realized.cron_entries {
        println!(
            "    cron {} [{} {} {} * {}] {}",
            cron.name,
            cron.schedule.minute,
            cron.schedule.hour,
            cron.schedule.monthday,
            cron.schedule.weekday,
            cron.command
        );
    }
    for one_shot in &realized.one_shot_commands {
        println!("    once {} {}", one_shot.name, one_shot.command);
    }
    if !packages.is_empty() {
        let names: Vec<&str> = packages.iter().map(|p| p.name.as_str()).collect();
        println!("  packages: {}", names.join(", "));
    }
    match repo {
        Some(RepoSource::Apt { location, release }) => {
            println!("  repo: apt {} {}", location, release)
        }
        Some(RepoSource::Yum { baseurl }) => println!("  repo: yum {}", baseurl),
        None => {}
    }
}
