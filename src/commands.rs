use {
    crate::{
        args::{CancelArgs, CreateArgs, ProgramConfig, ShowArgs, UpdateReleaseArgs, WithdrawArgs},
        constants::{
            CREATE_COMPUTE_UNIT_LIMIT, FEE_ORACLE, RATE_PRECISION, STREAMFLOW_TREASURY, WITHDRAWOR,
        },
        error::Error,
        history, instructions,
        instructions::{CancelAccounts, CreateAccounts, UpdateReleaseAccounts, WithdrawAccounts},
        pda,
        state::{encode_stream_name, CreateParams, ProxyContract, StreamContract},
    },
    console::style,
    itertools::Itertools,
    log::info,
    solana_client::rpc_client::RpcClient,
    solana_sdk::{
        commitment_config::CommitmentConfig,
        compute_budget::ComputeBudgetInstruction,
        instruction::Instruction,
        pubkey::Pubkey,
        signature::{Keypair, Signature, Signer},
        transaction::Transaction,
    },
    spl_associated_token_account::instruction::create_associated_token_account,
};

fn unique_signers(signers: Vec<&dyn Signer>) -> Vec<&dyn Signer> {
    signers.into_iter().unique_by(|s| s.pubkey()).collect_vec()
}

/// Scale a decimal rate into its fixed-point wire representation.
fn scale_rate(rate: f64) -> u32 {
    (rate * RATE_PRECISION as f64) as u32
}

fn send_instructions(
    client: &RpcClient,
    instructions: &[Instruction],
    payer: &Pubkey,
    signers: &Vec<&dyn Signer>,
) -> Result<Signature, Error> {
    let blockhash = client.get_latest_blockhash()?;
    let transaction =
        Transaction::new_signed_with_payer(instructions, Some(payer), signers, blockhash);
    client
        .send_and_confirm_transaction_with_spinner(&transaction)
        .map_err(Error::from_submission)
}

/// Create the associated token account for `owner` if it does not exist yet.
fn ensure_associated_token_account(
    client: &RpcClient,
    payer: &dyn Signer,
    owner: &Pubkey,
    mint: &Pubkey,
    label: &str,
) -> Result<(), Error> {
    let address = pda::associated_token_address(owner, mint);
    let account = client
        .get_account_with_commitment(&address, CommitmentConfig::confirmed())?
        .value;
    if account.is_some() {
        return Ok(());
    }
    println!("Initializing {label} token account");
    let instruction =
        create_associated_token_account(&payer.pubkey(), owner, mint, &spl_token::id());
    let signers: Vec<&dyn Signer> = vec![payer];
    let signature = send_instructions(client, &[instruction], &payer.pubkey(), &signers)?;
    info!("created associated token account {address} in {signature}");
    Ok(())
}

pub fn process_create(
    client: &RpcClient,
    config: &ProgramConfig,
    args: &CreateArgs<Pubkey, Box<dyn Signer>>,
) -> Result<(), Error> {
    let stream_keypair = Keypair::new();
    let stream_metadata = stream_keypair.pubkey();
    let sender_pubkey = args.sender.pubkey();

    let (proxy_metadata, _) = pda::proxy_metadata_address(&stream_metadata, &config.proxy_program)?;
    let (escrow_tokens, _) = pda::escrow_address(&stream_metadata, &config.streamflow_program)?;
    let proxy_tokens = pda::associated_token_address(&proxy_metadata, &args.mint);
    let sender_tokens = pda::associated_token_address(&sender_pubkey, &args.mint);
    let recipient_tokens = pda::associated_token_address(&args.recipient, &args.mint);

    let params = CreateParams {
        start_time: 0,
        net_amount_deposited: args.net_amount,
        period: args.period,
        amount_per_period: args.amount_per_period,
        cliff: 0,
        cliff_amount: 0,
        cancelable_by_sender: true,
        cancelable_by_recipient: true,
        automatic_withdrawal: false,
        transferable_by_sender: false,
        transferable_by_recipient: false,
        can_topup: false,
        stream_name: encode_stream_name(&args.name).ok_or(Error::NameTooLong)?,
        withdraw_frequency: 0,
        pausable: false,
        can_update_rate: false,
        increase_rate: scale_rate(args.increase_rate),
        penalty_rate: scale_rate(args.penalty_rate),
        is_penalized: args.penalized,
    };

    ensure_associated_token_account(
        client,
        &*args.sender,
        &STREAMFLOW_TREASURY,
        &args.mint,
        "Treasury",
    )?;
    ensure_associated_token_account(
        client,
        &*args.sender,
        &args.recipient,
        &args.mint,
        "Recipient",
    )?;

    let accounts = CreateAccounts {
        sender: sender_pubkey,
        sender_tokens,
        recipient: args.recipient,
        recipient_tokens,
        proxy_metadata,
        proxy_tokens,
        stream_metadata,
        escrow_tokens,
        withdrawor: WITHDRAWOR,
        // The sender doubles as its own partner, so partner fees flow back.
        partner: sender_pubkey,
        partner_tokens: sender_tokens,
        mint: args.mint,
        fee_oracle: FEE_ORACLE,
        streamflow_program: config.streamflow_program,
    };
    let instructions = vec![
        ComputeBudgetInstruction::set_compute_unit_limit(CREATE_COMPUTE_UNIT_LIMIT),
        ComputeBudgetInstruction::set_compute_unit_price(config.priority_fee),
        instructions::create(&accounts, &params, &config.proxy_program, &[]),
    ];
    let signers = unique_signers(vec![&*args.sender, &stream_keypair]);
    let signature = send_instructions(client, &instructions, &sender_pubkey, &signers)?;

    println!("Proxy Account id: {proxy_metadata}");
    println!("Vesting Stream id: {stream_metadata}");
    println!("Tx: {signature}");
    Ok(())
}

pub fn process_withdraw(
    client: &RpcClient,
    config: &ProgramConfig,
    args: &WithdrawArgs<Pubkey, Box<dyn Signer>>,
) -> Result<(), Error> {
    let creation = history::resolve_creation_accounts(client, &args.stream_id)?;
    info!(
        "resolved stream {} created by {}",
        creation.stream_metadata, creation.sender
    );
    let (escrow_tokens, _) =
        pda::escrow_address(&creation.stream_metadata, &config.streamflow_program)?;

    let accounts = WithdrawAccounts {
        authority: args.authority.pubkey(),
        recipient: creation.recipient,
        recipient_tokens: pda::associated_token_address(&creation.recipient, &creation.mint),
        stream_metadata: creation.stream_metadata,
        escrow_tokens,
        streamflow_treasury: STREAMFLOW_TREASURY,
        streamflow_treasury_tokens: pda::associated_token_address(
            &STREAMFLOW_TREASURY,
            &creation.mint,
        ),
        sender: creation.sender,
        sender_tokens: pda::associated_token_address(&creation.sender, &creation.mint),
        mint: creation.mint,
    };
    let instructions = vec![
        ComputeBudgetInstruction::set_compute_unit_price(config.priority_fee),
        instructions::withdraw(&accounts, args.amount, &config.streamflow_program, &[]),
    ];
    let authority_pubkey = args.authority.pubkey();
    let signers: Vec<&dyn Signer> = vec![&*args.authority];
    let signature = send_instructions(client, &instructions, &authority_pubkey, &signers)?;

    println!("Tx: {signature}");
    Ok(())
}

pub fn process_cancel(
    client: &RpcClient,
    config: &ProgramConfig,
    args: &CancelArgs<Pubkey, Box<dyn Signer>>,
) -> Result<(), Error> {
    let creation = history::resolve_creation_accounts(client, &args.stream_id)?;
    info!(
        "resolved stream {} created by {}",
        creation.stream_metadata, creation.sender
    );
    let (escrow_tokens, _) =
        pda::escrow_address(&creation.stream_metadata, &config.streamflow_program)?;

    let accounts = CancelAccounts {
        // The authority takes the sender seat; token accounts stay with the
        // parties recorded at creation.
        sender: args.authority.pubkey(),
        sender_tokens: pda::associated_token_address(&creation.sender, &creation.mint),
        recipient: creation.recipient,
        recipient_tokens: pda::associated_token_address(&creation.recipient, &creation.mint),
        proxy_metadata: creation.proxy_metadata,
        proxy_tokens: pda::associated_token_address(&creation.proxy_metadata, &creation.mint),
        stream_metadata: creation.stream_metadata,
        escrow_tokens,
        streamflow_treasury: STREAMFLOW_TREASURY,
        streamflow_treasury_tokens: pda::associated_token_address(
            &STREAMFLOW_TREASURY,
            &creation.mint,
        ),
        partner: creation.partner,
        partner_tokens: pda::associated_token_address(&creation.partner, &creation.mint),
        mint: creation.mint,
        streamflow_program: creation.streamflow_program,
    };
    let instructions = vec![
        ComputeBudgetInstruction::set_compute_unit_price(config.priority_fee),
        instructions::cancel(&accounts, &config.proxy_program, &[]),
    ];
    let authority_pubkey = args.authority.pubkey();
    let signers: Vec<&dyn Signer> = vec![&*args.authority];
    let signature = send_instructions(client, &instructions, &authority_pubkey, &signers)?;

    println!("Tx: {signature}");
    Ok(())
}

pub fn process_update_release(
    client: &RpcClient,
    config: &ProgramConfig,
    args: &UpdateReleaseArgs<Pubkey, Box<dyn Signer>>,
) -> Result<(), Error> {
    let creation = history::resolve_creation_accounts(client, &args.stream_id)?;

    let accounts = UpdateReleaseAccounts {
        sender: args.authority.pubkey(),
        proxy_metadata: creation.proxy_metadata,
        stream_metadata: creation.stream_metadata,
        withdrawor: WITHDRAWOR,
        streamflow_program: creation.streamflow_program,
    };
    let instructions = vec![
        ComputeBudgetInstruction::set_compute_unit_price(config.priority_fee),
        instructions::update_release(&accounts, &config.proxy_program, &[]),
    ];
    let authority_pubkey = args.authority.pubkey();
    let signers: Vec<&dyn Signer> = vec![&*args.authority];
    let signature = send_instructions(client, &instructions, &authority_pubkey, &signers)?;

    println!("Tx: {signature}");
    Ok(())
}

pub fn process_show(client: &RpcClient, args: &ShowArgs<Pubkey>) -> Result<(), Error> {
    let account = client
        .get_account_with_commitment(&args.account, CommitmentConfig::confirmed())?
        .value
        .ok_or(Error::AccountNotFound(args.account))?;
    if args.proxy {
        print_proxy_contract(&ProxyContract::decode(&account.data)?);
    } else {
        print_stream_contract(&StreamContract::decode(&account.data)?);
    }
    Ok(())
}

fn print_proxy_contract(contract: &ProxyContract) {
    println!("{}", style("Proxy contract").bold());
    println!("{:<28}{}", "version:", contract.version);
    println!("{:<28}{}", "sender:", contract.sender);
    println!("{:<28}{}", "recipient:", contract.recipient);
    println!("{:<28}{}", "mint:", contract.mint);
    println!("{:<28}{}", "stream:", contract.stream);
    println!("{:<28}{}", "end time:", contract.end_time);
    println!("{:<28}{}", "last available:", contract.last_available);
    println!(
        "{:<28}{}",
        "last release update:", contract.last_release_update_time
    );
    println!("{:<28}{}", "canceled at:", contract.stream_canceled_at);
    println!("{}", style("Creation parameters").bold());
    println!("{:<28}{}", "name:", contract.ix.name());
    println!("{:<28}{}", "net amount:", contract.ix.net_amount_deposited);
    println!("{:<28}{}", "period:", contract.ix.period);
    println!(
        "{:<28}{}",
        "amount per period:", contract.ix.amount_per_period
    );
    println!(
        "{:<28}{}",
        "increase rate:",
        contract.ix.increase_rate as f64 / RATE_PRECISION as f64
    );
    println!(
        "{:<28}{}",
        "penalty rate:",
        contract.ix.penalty_rate as f64 / RATE_PRECISION as f64
    );
    println!("{:<28}{}", "penalized:", contract.ix.is_penalized);
}

fn print_stream_contract(contract: &StreamContract) {
    println!("{}", style("Stream contract").bold());
    println!("{:<28}{}", "state:", contract.state());
    println!("{:<28}{}", "version:", contract.version);
    println!("{:<28}{}", "name:", contract.ix.name());
    println!("{:<28}{}", "created at:", contract.created_at);
    println!("{:<28}{}", "end time:", contract.end_time);
    println!("{:<28}{}", "amount withdrawn:", contract.amount_withdrawn);
    println!("{:<28}{}", "last withdrawn at:", contract.last_withdrawn_at);
    println!("{:<28}{}", "canceled at:", contract.canceled_at);
    println!("{:<28}{}", "sender:", contract.sender);
    println!("{:<28}{}", "recipient:", contract.recipient);
    println!("{:<28}{}", "mint:", contract.mint);
    println!("{:<28}{}", "escrow:", contract.escrow_tokens);
    println!("{:<28}{}", "partner:", contract.partner);
    println!("{:<28}{}", "net amount:", contract.ix.net_amount_deposited);
    println!("{:<28}{}", "period:", contract.ix.period);
    println!(
        "{:<28}{}",
        "amount per period:", contract.ix.amount_per_period
    );
    println!("{:<28}{}", "pause cumulative:", contract.pause_cumulative);
}
