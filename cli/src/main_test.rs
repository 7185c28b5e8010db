use super::*;

fn parse(args: &[&str]) -> Cli {
    let mut argv = vec!["netconsole", "--token-file", "/tmp/netconsole-test/token.json"];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).unwrap()
}

#[test]
fn flags_map_onto_config_vars() {
    let cli = parse(&["--api-base-url", "https://ops.example.net/api/v1", "--timeout-secs", "5", "whoami"]);
    let config = ClientConfig::from_vars(&cli.config_vars()).unwrap();
    assert_eq!(config.effective_base_url(), "https://ops.example.net/api/v1");
    assert_eq!(config.timeouts.request_secs, 5);
    assert_eq!(config.token_file, PathBuf::from("/tmp/netconsole-test/token.json"));
}

#[test]
fn devices_accepts_shared_crud_and_batch_status() {
    let cli = parse(&["devices", "batch-status", "--status", "inactive", "1", "2"]);
    match cli.command {
        Command::Devices(DevicesCommand { command: DevicesSubcommand::BatchStatus { status, ids } }) => {
            assert_eq!(status, "inactive");
            assert_eq!(ids, vec![1, 2]);
        }
        other => panic!("unexpected command: {other:?}"),
    }

    let cli = parse(&["devices", "list", "--limit", "20"]);
    assert!(matches!(
        cli.command,
        Command::Devices(DevicesCommand { command: DevicesSubcommand::Crud(CrudSubcommand::List(_)) })
    ));
}

#[test]
fn collect_batch_takes_repeated_kinds() {
    let cli = parse(&["collect", "batch", "--kind", "version", "--kind", "mac-table", "4", "5"]);
    let Command::Collect(CollectCommand { command: CollectSubcommand::Batch { kinds, device_ids } }) = cli.command else {
        panic!("expected collect batch");
    };
    let kinds = kinds.into_iter().map(CollectKind::from).collect::<Vec<_>>();
    assert_eq!(kinds, vec![CollectKind::Version, CollectKind::MacTable]);
    assert_eq!(device_ids, vec![4, 5]);
}

#[test]
fn login_requires_username() {
    let argv = ["netconsole", "login", "--password", "x"];
    assert!(Cli::try_parse_from(argv).is_err());
}

#[test]
fn parse_json_rejects_garbage() {
    assert!(matches!(parse_json("{nope"), Err(CliError::InvalidJson(_))));
    assert_eq!(parse_json(r#"{"a": 1}"#).unwrap()["a"], 1);
}

#[test]
fn exec_variables_must_be_an_object() {
    assert!(matches!(
        parse_json_object("[1]", "--variables"),
        Err(CliError::NotAnObject { field: "--variables" })
    ));
    assert!(matches!(parse_json_object("{nope", "--variables"), Err(CliError::InvalidJson(_))));
    assert_eq!(parse_json_object(r#"{"vlan": 10}"#, "--variables").unwrap()["vlan"], 10);
}

#[test]
fn collect_all_takes_a_device() {
    let cli = parse(&["collect", "all", "7"]);
    assert!(matches!(
        cli.command,
        Command::Collect(CollectCommand { command: CollectSubcommand::All { device_id: 7 } })
    ));
}
