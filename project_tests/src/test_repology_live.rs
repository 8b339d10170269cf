//! # Repology Live API Test
//!
//! Runs the client against the real service and prints what came back.
//! Every call goes through the shared gate, so the whole run takes a few
//! seconds even when the service answers instantly.

use clap::Parser;
use lib_repology::loggers::{LogOptions, init_tracing};
use lib_repology::{ClientConfig, ProjectQuery, RepologyClient};
use std::time::Instant;

/// Live smoke test for lib_repology.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Project to look up.
    #[arg(long, default_value = "firefox")]
    project: String,

    /// Repository used for the problems report.
    #[arg(long, default_value = "freebsd")]
    repository: String,

    /// Log filter when RUST_LOG is unset.
    #[arg(long, default_value = "debug")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // // Statement: stderr logging only, no file output for a smoke test
    let _guard = init_tracing(&LogOptions {
        app_name: "repology_live".to_string(),
        level: args.log_level.clone(),
        ..LogOptions::default()
    })?;

    let client = RepologyClient::with_config(ClientConfig::load(None)?)?;
    let started = Instant::now();

    println!("[*] get_project({})", args.project);
    let packages = client.get_project(&args.project).await?;
    println!("[SUCCESS] {} packages", packages.len());
    if let Some(first) = packages.first() {
        println!("{}", serde_json::to_string_pretty(first)?);
    }

    println!("\n[*] search_projects(\"{}\", 5)", args.project);
    let found = client
        .search_projects(&args.project, 5, ProjectQuery::default())
        .await?;
    println!("[SUCCESS] {:?}", found.keys().collect::<Vec<_>>());

    println!("\n[*] list_projects(start = \"{}\", limit = 3, newest)", args.project);
    let query = ProjectQuery {
        start: Some(args.project.clone()),
        limit: Some(3),
        newest: true,
        ..ProjectQuery::default()
    };
    let listed = client.list_projects(&query).await?;
    println!("[SUCCESS] {:?}", listed.keys().collect::<Vec<_>>());

    println!("\n[*] get_repository_problems({})", args.repository);
    let problems = client.get_repository_problems(&args.repository, None).await?;
    println!("[SUCCESS] {} problems", problems.len());

    println!("\n[*] get_project(<nonexistent>)");
    match client.get_project("this-project-does-not-exist-xyz").await {
        Err(e) if e.is_not_found() => println!("[SUCCESS] not found, as expected"),
        Ok(packages) if packages.is_empty() => println!("[SUCCESS] empty result"),
        other => {
            eprintln!("[ERROR] unexpected outcome: {:?}", other.map(|p| p.len()));
            std::process::exit(1);
        }
    }

    println!("\n[INFO] Finished in {:?}", started.elapsed());
    client.close();
    Ok(())
}
