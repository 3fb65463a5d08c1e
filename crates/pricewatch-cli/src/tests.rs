use super::*;

#[test]
fn parses_db_init_command() {
    let cli = Cli::try_parse_from(["pricewatch", "db", "init"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Db {
            command: DbCommands::Init
        }
    ));
}

#[test]
fn missing_command_is_rejected() {
    assert!(Cli::try_parse_from(["pricewatch"]).is_err());
}

#[test]
fn check_defaults_to_all_products() {
    let cli = Cli::try_parse_from(["pricewatch", "check"]).unwrap();
    assert!(matches!(cli.command, Commands::Check { product: None }));
}

#[test]
fn check_with_product_filter() {
    let cli = Cli::try_parse_from(["pricewatch", "check", "--product", "Laptop"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Check { product: Some(ref p) } if p == "Laptop"
    ));
}

#[test]
fn add_requires_name_and_url() {
    assert!(Cli::try_parse_from(["pricewatch", "add", "--name", "Laptop"]).is_err());

    let cli = Cli::try_parse_from([
        "pricewatch",
        "add",
        "--name",
        "Laptop",
        "--url",
        "https://example.com/laptop",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Commands::Add { ref name, ref url }
            if name == "Laptop" && url == "https://example.com/laptop"
    ));
}

#[test]
fn remove_prompts_by_default() {
    let cli = Cli::try_parse_from(["pricewatch", "remove", "Laptop"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Remove { ref name, yes: false } if name == "Laptop"
    ));
}

#[test]
fn remove_with_yes_flag() {
    for flag in ["--yes", "-y"] {
        let cli = Cli::try_parse_from(["pricewatch", "remove", "Laptop", flag]).unwrap();
        assert!(matches!(cli.command, Commands::Remove { yes: true, .. }));
    }
}

#[test]
fn parses_list_and_history() {
    let cli = Cli::try_parse_from(["pricewatch", "list"]).unwrap();
    assert!(matches!(cli.command, Commands::List));

    let cli = Cli::try_parse_from(["pricewatch", "history", "Laptop"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::History { ref name } if name == "Laptop"
    ));
}
