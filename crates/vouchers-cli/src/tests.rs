use super::*;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["vouchers"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
    assert!(!cli.verbose);
}

#[test]
fn parses_run_command() {
    let cli = Cli::try_parse_from(["vouchers", "run"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Some(Commands::Run { force: false })));
}

#[test]
fn parses_run_force() {
    let cli = Cli::try_parse_from(["vouchers", "run", "--force"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Some(Commands::Run { force: true })));
}

#[test]
fn parses_watch_command() {
    let cli = Cli::try_parse_from(["vouchers", "watch"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Some(Commands::Watch)));
}

#[test]
fn parses_harvest_command() {
    let cli = Cli::try_parse_from(["vouchers", "harvest"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Some(Commands::Harvest)));
}

#[test]
fn parses_shop_with_url() {
    let cli = Cli::try_parse_from([
        "vouchers",
        "shop",
        "https://gutscheine.blick.ch/acme-gutscheine",
    ])
    .expect("expected valid cli args");
    match cli.command {
        Some(Commands::Shop { url, cached }) => {
            assert_eq!(url, "https://gutscheine.blick.ch/acme-gutscheine");
            assert!(!cached);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn parses_shop_cached() {
    let cli = Cli::try_parse_from(["vouchers", "shop", "--cached", "acme-gutscheine"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Shop { cached: true, .. })
    ));
}

#[test]
fn shop_requires_url() {
    assert!(Cli::try_parse_from(["vouchers", "shop"]).is_err());
}

#[test]
fn verbose_is_global() {
    let cli = Cli::try_parse_from(["vouchers", "watch", "-v"]).expect("expected valid cli args");
    assert!(cli.verbose);
    let cli = Cli::try_parse_from(["vouchers", "--verbose", "run"]).expect("expected valid cli args");
    assert!(cli.verbose);
}

#[test]
fn unknown_command_is_rejected() {
    assert!(Cli::try_parse_from(["vouchers", "collect"]).is_err());
}
