use {
    crate::constants::{STREAMFLOW_DEVNET_PROGRAM_ID, STREAMFLOW_PROGRAM_ID},
    solana_sdk::{
        pubkey::Pubkey,
        signature::{read_keypair_file, Keypair, Signer},
    },
    std::{error::Error, path::Path},
};

pub struct CreateArgs<P, K> {
    pub sender: K,
    pub recipient: P,
    pub mint: P,
    pub net_amount: u64,
    pub period: u64,
    pub amount_per_period: u64,
    pub increase_rate: f64,
    pub penalty_rate: f64,
    pub penalized: bool,
    pub name: String,
}

pub struct WithdrawArgs<P, K> {
    pub authority: K,
    pub stream_id: P,
    pub amount: u64,
}

pub struct CancelArgs<P, K> {
    pub authority: K,
    pub stream_id: P,
}

pub struct UpdateReleaseArgs<P, K> {
    pub authority: K,
    pub stream_id: P,
}

pub struct ShowArgs<P> {
    pub account: P,
    pub proxy: bool,
}

pub enum Command<P, K> {
    Create(CreateArgs<P, K>),
    Withdraw(WithdrawArgs<P, K>),
    Cancel(CancelArgs<P, K>),
    UpdateRelease(UpdateReleaseArgs<P, K>),
    Show(ShowArgs<P>),
}

pub struct Args<P, K> {
    pub config_file: String,
    pub url: Option<String>,
    pub devnet: bool,
    pub program_id: String,
    pub streamflow_program_id: Option<String>,
    pub priority_fee: u64,
    pub command: Command<P, K>,
}

/// Program ids and fee settings shared by every command.
pub struct ProgramConfig {
    pub proxy_program: Pubkey,
    pub streamflow_program: Pubkey,
    pub priority_fee: u64,
}

impl ProgramConfig {
    /// An explicit `--streamflow-program-id` takes precedence over the
    /// `--devnet` default.
    pub fn resolve<P, K>(args: &Args<P, K>) -> Result<Self, Box<dyn Error>> {
        let proxy_program = resolve_pubkey(&args.program_id, "program id")?;
        let streamflow_program = match &args.streamflow_program_id {
            Some(id) => resolve_pubkey(id, "streamflow program id")?,
            None if args.devnet => STREAMFLOW_DEVNET_PROGRAM_ID,
            None => STREAMFLOW_PROGRAM_ID,
        };
        Ok(Self {
            proxy_program,
            streamflow_program,
            priority_fee: args.priority_fee,
        })
    }
}

fn resolve_pubkey(value: &str, name: &str) -> Result<Pubkey, Box<dyn Error>> {
    value
        .parse()
        .map_err(|err| format!("invalid {name}: {err}").into())
}

/// Load a signer from a keypair file, falling back to interpreting the value
/// as a base58-encoded private key.
fn resolve_signer(value: &str, name: &str) -> Result<Box<dyn Signer>, Box<dyn Error>> {
    if Path::new(value).exists() {
        let keypair = read_keypair_file(value)
            .map_err(|err| format!("invalid {name} keypair file: {err}"))?;
        return Ok(Box::new(keypair));
    }
    let bytes = bs58::decode(value)
        .into_vec()
        .map_err(|_| format!("invalid {name}: not a keypair file or base58 key"))?;
    let keypair = Keypair::from_bytes(&bytes)
        .map_err(|_| format!("invalid {name}: not a keypair file or base58 key"))?;
    Ok(Box::new(keypair))
}

pub fn resolve_command(
    command: Command<String, String>,
) -> Result<Command<Pubkey, Box<dyn Signer>>, Box<dyn Error>> {
    match command {
        Command::Create(args) => {
            let resolved_args = CreateArgs {
                sender: resolve_signer(&args.sender, "sender")?,
                recipient: resolve_pubkey(&args.recipient, "recipient")?,
                mint: resolve_pubkey(&args.mint, "mint")?,
                net_amount: args.net_amount,
                period: args.period,
                amount_per_period: args.amount_per_period,
                increase_rate: args.increase_rate,
                penalty_rate: args.penalty_rate,
                penalized: args.penalized,
                name: args.name,
            };
            Ok(Command::Create(resolved_args))
        }
        Command::Withdraw(args) => {
            let resolved_args = WithdrawArgs {
                authority: resolve_signer(&args.authority, "authority")?,
                stream_id: resolve_pubkey(&args.stream_id, "stream id")?,
                amount: args.amount,
            };
            Ok(Command::Withdraw(resolved_args))
        }
        Command::Cancel(args) => {
            let resolved_args = CancelArgs {
                authority: resolve_signer(&args.authority, "authority")?,
                stream_id: resolve_pubkey(&args.stream_id, "stream id")?,
            };
            Ok(Command::Cancel(resolved_args))
        }
        Command::UpdateRelease(args) => {
            let resolved_args = UpdateReleaseArgs {
                authority: resolve_signer(&args.authority, "authority")?,
                stream_id: resolve_pubkey(&args.stream_id, "stream id")?,
            };
            Ok(Command::UpdateRelease(resolved_args))
        }
        Command::Show(args) => {
            let resolved_args = ShowArgs {
                account: resolve_pubkey(&args.account, "account")?,
                proxy: args.proxy,
            };
            Ok(Command::Show(resolved_args))
        }
    }
}

#[cfg(test)]
mod tests {
    use {super::*, crate::constants::PROXY_PROGRAM_ID};

    fn string_args(command: Command<String, String>) -> Args<String, String> {
        Args {
            config_file: String::default(),
            url: None,
            devnet: false,
            program_id: PROXY_PROGRAM_ID.to_string(),
            streamflow_program_id: None,
            priority_fee: 0,
            command,
        }
    }

    #[test]
    fn test_program_config_defaults_to_mainnet() {
        let args = string_args(Command::Show(ShowArgs {
            account: Pubkey::new_unique().to_string(),
            proxy: false,
        }));
        let config = ProgramConfig::resolve(&args).unwrap();
        assert_eq!(config.proxy_program, PROXY_PROGRAM_ID);
        assert_eq!(config.streamflow_program, STREAMFLOW_PROGRAM_ID);
    }

    #[test]
    fn test_program_config_devnet_flag() {
        let mut args = string_args(Command::Show(ShowArgs {
            account: Pubkey::new_unique().to_string(),
            proxy: false,
        }));
        args.devnet = true;
        let config = ProgramConfig::resolve(&args).unwrap();
        assert_eq!(config.streamflow_program, STREAMFLOW_DEVNET_PROGRAM_ID);
    }

    #[test]
    fn test_program_config_explicit_id_beats_devnet() {
        let explicit = Pubkey::new_unique();
        let mut args = string_args(Command::Show(ShowArgs {
            account: Pubkey::new_unique().to_string(),
            proxy: false,
        }));
        args.devnet = true;
        args.streamflow_program_id = Some(explicit.to_string());
        let config = ProgramConfig::resolve(&args).unwrap();
        assert_eq!(config.streamflow_program, explicit);
    }

    #[test]
    fn test_resolve_signer_from_base58() {
        let keypair = Keypair::new();
        let signer = resolve_signer(&keypair.to_base58_string(), "sender").unwrap();
        assert_eq!(signer.pubkey(), keypair.pubkey());
    }

    #[test]
    fn test_resolve_signer_rejects_garbage() {
        assert!(resolve_signer("definitely-not-a-key", "sender").is_err());
    }
}
