pub mod arg_parser;
pub mod args;
pub mod commands;
pub mod constants;
pub mod error;
pub mod history;
pub mod instructions;
pub mod pda;
pub mod state;
