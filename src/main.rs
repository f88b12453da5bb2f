use {
    nonlinear_streams::{
        arg_parser::parse_args,
        args::{resolve_command, Command, ProgramConfig},
        commands,
    },
    solana_clap_utils::input_validators::normalize_to_url_if_moniker,
    solana_cli_config::{Config, CONFIG_FILE},
    solana_client::rpc_client::RpcClient,
    std::{env, error::Error, path::Path, process},
};

fn main() -> Result<(), Box<dyn Error>> {
    solana_logger::setup_with_default("info");
    let command_args = parse_args(env::args_os());
    let config = if Path::new(&command_args.config_file).exists() {
        Config::load(&command_args.config_file)?
    } else {
        let default_config_file = CONFIG_FILE.as_ref().unwrap();
        if command_args.config_file != *default_config_file {
            eprintln!("Error: config file not found");
            process::exit(1);
        }
        Config::default()
    };
    let json_rpc_url = match &command_args.url {
        Some(url) => normalize_to_url_if_moniker(url),
        None if command_args.devnet => normalize_to_url_if_moniker("devnet"),
        None => config.json_rpc_url.clone(),
    };
    let program_config = ProgramConfig::resolve(&command_args)?;
    let client = RpcClient::new(json_rpc_url);

    match resolve_command(command_args.command)? {
        Command::Create(args) => {
            commands::process_create(&client, &program_config, &args)?;
        }
        Command::Withdraw(args) => {
            commands::process_withdraw(&client, &program_config, &args)?;
        }
        Command::Cancel(args) => {
            commands::process_cancel(&client, &program_config, &args)?;
        }
        Command::UpdateRelease(args) => {
            commands::process_update_release(&client, &program_config, &args)?;
        }
        Command::Show(args) => {
            commands::process_show(&client, &args)?;
        }
    }
    Ok(())
}
