use {
    crate::args::{
        Args, CancelArgs, Command, CreateArgs, ShowArgs, UpdateReleaseArgs, WithdrawArgs,
    },
    clap::{
        crate_description, crate_name, crate_version, value_t_or_exit, App, Arg, ArgMatches,
        SubCommand,
    },
    solana_clap_utils::input_validators::{is_amount, is_url_or_moniker, is_valid_pubkey},
    solana_cli_config::CONFIG_FILE,
    std::{ffi::OsString, process::exit},
};

fn get_matches<'a, I, T>(args: I) -> ArgMatches<'a>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let default_config_file = CONFIG_FILE.as_ref().unwrap();
    App::new(crate_name!())
        .about(crate_description!())
        .version(crate_version!())
        .arg(
            Arg::with_name("config_file")
                .short("C")
                .long("config")
                .takes_value(true)
                .value_name("FILEPATH")
                .default_value(default_config_file)
                .help("Config file"),
        )
        .arg(
            Arg::with_name("json_rpc_url")
                .short("u")
                .long("url")
                .value_name("URL_OR_MONIKER")
                .takes_value(true)
                .global(true)
                .validator(is_url_or_moniker)
                .help(
                    "URL for Solana's JSON RPC or moniker (or their first letter): \
                       [mainnet-beta, testnet, devnet, localhost]",
                ),
        )
        .arg(
            Arg::with_name("devnet")
                .long("devnet")
                .global(true)
                .help("Use devnet cluster and program ids"),
        )
        .arg(
            Arg::with_name("program_id")
                .long("program-id")
                .value_name("PUBKEY")
                .takes_value(true)
                .global(true)
                .validator(is_valid_pubkey)
                .default_value("strn1sS2qKxs7SgJ1xx4trPKSWdqxFim6HFG9ETXiCL")
                .help("Proxy program id"),
        )
        .arg(
            Arg::with_name("streamflow_program_id")
                .long("streamflow-program-id")
                .value_name("PUBKEY")
                .takes_value(true)
                .global(true)
                .validator(is_valid_pubkey)
                .help(
                    "Streamflow vesting program id, takes precedence over the \
                       --devnet flag",
                ),
        )
        .arg(
            Arg::with_name("priority_fee")
                .long("priority-fee")
                .value_name("MICRO_LAMPORTS")
                .takes_value(true)
                .global(true)
                .default_value("0")
                .help("Priority fee used in transactions, as price per compute unit"),
        )
        .subcommand(
            SubCommand::with_name("create")
                .about("Create a vesting stream")
                .arg(
                    Arg::with_name("recipient")
                        .index(1)
                        .required(true)
                        .value_name("RECIPIENT")
                        .validator(is_valid_pubkey)
                        .help("Recipient of the vested tokens"),
                )
                .arg(
                    Arg::with_name("mint")
                        .short("m")
                        .long("mint")
                        .takes_value(true)
                        .value_name("PUBKEY")
                        .validator(is_valid_pubkey)
                        .default_value("Es9vMFrzaCERmJfrF4H2FYD4KCoNkY11McCe8BenwNYB")
                        .help("Mint of the token to vest"),
                )
                .arg(
                    Arg::with_name("net_amount")
                        .short("n")
                        .long("net-amount")
                        .takes_value(true)
                        .value_name("AMOUNT")
                        .default_value("1000000")
                        .help("Total amount of tokens to vest, in base units"),
                )
                .arg(
                    Arg::with_name("period")
                        .short("p")
                        .long("period")
                        .takes_value(true)
                        .value_name("SECONDS")
                        .default_value("30")
                        .help("Release period, release A amount every P seconds"),
                )
                .arg(
                    Arg::with_name("amount_per_period")
                        .short("a")
                        .long("amount-per-period")
                        .takes_value(true)
                        .value_name("AMOUNT")
                        .default_value("100000")
                        .help("Release amount, every P seconds release A amount"),
                )
                .arg(
                    Arg::with_name("increase_rate")
                        .long("increase-rate")
                        .takes_value(true)
                        .value_name("RATE")
                        .validator(is_amount)
                        .default_value("1.5")
                        .help("Increase rate, A amount will be increased by it every P seconds"),
                )
                .arg(
                    Arg::with_name("penalty_rate")
                        .long("penalty-rate")
                        .takes_value(true)
                        .value_name("RATE")
                        .validator(is_amount)
                        .default_value("1")
                        .help("Penalty rate, enacted when recipient withdraws between periods"),
                )
                .arg(
                    Arg::with_name("penalized")
                        .long("penalized")
                        .help("Penalize for claims"),
                )
                .arg(
                    Arg::with_name("name")
                        .long("name")
                        .takes_value(true)
                        .value_name("NAME")
                        .default_value("")
                        .help("Name of the vesting stream"),
                )
                .arg(
                    Arg::with_name("sender")
                        .long("key")
                        .takes_value(true)
                        .value_name("KEYPAIR")
                        .default_value("sender.json")
                        .help(
                            "Path to the keypair file for the stream sender, or a \
                               base58 encoded private key",
                        ),
                ),
        )
        .subcommand(
            SubCommand::with_name("withdraw")
                .about("Withdraw released funds from a stream")
                .arg(
                    Arg::with_name("stream_id")
                        .short("s")
                        .long("stream-id")
                        .required(true)
                        .takes_value(true)
                        .value_name("PUBKEY")
                        .validator(is_valid_pubkey)
                        .help("Vesting stream id"),
                )
                .arg(
                    Arg::with_name("amount")
                        .short("a")
                        .long("amount")
                        .takes_value(true)
                        .value_name("AMOUNT")
                        .default_value("18446744073709551615")
                        .help("Amount to withdraw, in base units; defaults to everything"),
                )
                .arg(
                    Arg::with_name("authority")
                        .long("key")
                        .takes_value(true)
                        .value_name("KEYPAIR")
                        .default_value("recipient.json")
                        .help(
                            "Path to the keypair file for the withdrawal authority, or \
                               a base58 encoded private key",
                        ),
                ),
        )
        .subcommand(
            SubCommand::with_name("cancel")
                .about("Cancel a stream and return unvested funds")
                .arg(
                    Arg::with_name("stream_id")
                        .short("s")
                        .long("stream-id")
                        .required(true)
                        .takes_value(true)
                        .value_name("PUBKEY")
                        .validator(is_valid_pubkey)
                        .help("Vesting stream id"),
                )
                .arg(
                    Arg::with_name("authority")
                        .long("key")
                        .takes_value(true)
                        .value_name("KEYPAIR")
                        .default_value("sender.json")
                        .help(
                            "Path to the keypair file for the cancel authority, or a \
                               base58 encoded private key",
                        ),
                ),
        )
        .subcommand(
            SubCommand::with_name("update-release")
                .about("Apply the next release-rate increase to a stream")
                .arg(
                    Arg::with_name("stream_id")
                        .short("s")
                        .long("stream-id")
                        .required(true)
                        .takes_value(true)
                        .value_name("PUBKEY")
                        .validator(is_valid_pubkey)
                        .help("Vesting stream id"),
                )
                .arg(
                    Arg::with_name("authority")
                        .long("key")
                        .takes_value(true)
                        .value_name("KEYPAIR")
                        .default_value("sender.json")
                        .help(
                            "Path to the keypair file for the stream sender, or a \
                               base58 encoded private key",
                        ),
                ),
        )
        .subcommand(
            SubCommand::with_name("show")
                .about("Fetch and decode a stream account")
                .arg(
                    Arg::with_name("account")
                        .index(1)
                        .required(true)
                        .value_name("ACCOUNT")
                        .validator(is_valid_pubkey)
                        .help("Stream metadata account, or proxy metadata with --proxy"),
                )
                .arg(
                    Arg::with_name("proxy")
                        .long("proxy")
                        .help("Decode the account as proxy metadata"),
                ),
        )
        .get_matches_from(args)
}

pub fn parse_args<I, T>(args: I) -> Args<String, String>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = get_matches(args);
    let config_file = matches.value_of("config_file").unwrap().to_string();
    let url = matches.value_of("json_rpc_url").map(|url| url.to_string());
    let devnet = matches.is_present("devnet");
    let program_id = matches.value_of("program_id").unwrap().to_string();
    let streamflow_program_id = matches
        .value_of("streamflow_program_id")
        .map(|id| id.to_string());
    let priority_fee = value_t_or_exit!(matches, "priority_fee", u64);

    let command = match matches.subcommand() {
        ("create", Some(matches)) => Command::Create(CreateArgs {
            sender: matches.value_of("sender").unwrap().to_string(),
            recipient: matches.value_of("recipient").unwrap().to_string(),
            mint: matches.value_of("mint").unwrap().to_string(),
            net_amount: value_t_or_exit!(matches, "net_amount", u64),
            period: value_t_or_exit!(matches, "period", u64),
            amount_per_period: value_t_or_exit!(matches, "amount_per_period", u64),
            increase_rate: value_t_or_exit!(matches, "increase_rate", f64),
            penalty_rate: value_t_or_exit!(matches, "penalty_rate", f64),
            penalized: matches.is_present("penalized"),
            name: matches.value_of("name").unwrap().to_string(),
        }),
        ("withdraw", Some(matches)) => Command::Withdraw(WithdrawArgs {
            authority: matches.value_of("authority").unwrap().to_string(),
            stream_id: matches.value_of("stream_id").unwrap().to_string(),
            amount: value_t_or_exit!(matches, "amount", u64),
        }),
        ("cancel", Some(matches)) => Command::Cancel(CancelArgs {
            authority: matches.value_of("authority").unwrap().to_string(),
            stream_id: matches.value_of("stream_id").unwrap().to_string(),
        }),
        ("update-release", Some(matches)) => Command::UpdateRelease(UpdateReleaseArgs {
            authority: matches.value_of("authority").unwrap().to_string(),
            stream_id: matches.value_of("stream_id").unwrap().to_string(),
        }),
        ("show", Some(matches)) => Command::Show(ShowArgs {
            account: matches.value_of("account").unwrap().to_string(),
            proxy: matches.is_present("proxy"),
        }),
        _ => {
            eprintln!("{}", matches.usage());
            exit(1);
        }
    };

    Args {
        config_file,
        url,
        devnet,
        program_id,
        streamflow_program_id,
        priority_fee,
        command,
    }
}
