use std::net::SocketAddr;

use clap::{Parser, Subcommand};

use osckit::{Argument, Message, Node, OscError, Packet, StandardDispatcher};

#[derive(Parser)]
#[command(name = "osckit", about = "Send and receive OSC packets over UDP")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Send a single OSC message
    Send {
        /// Target address, e.g. 127.0.0.1:8000
        target: String,
        /// OSC address, e.g. /mixer/volume
        address: String,
        /// Arguments: integers become int32, decimals float32, the rest strings
        args: Vec<String>,
    },
    /// Listen for OSC packets and print every received message
    Listen {
        /// Local bind address, e.g. 0.0.0.0:8000
        bind: String,
    },
}

fn coerce(raw: &str) -> Argument {
    if let Ok(i) = raw.parse::<i32>() {
        return Argument::Int(i);
    }
    if let Ok(f) = raw.parse::<f32>() {
        return Argument::Float(f);
    }
    Argument::String(raw.to_string())
}

fn main() -> Result<(), OscError> {
    let cli = Cli::parse();
    match cli.command {
        Command::Send {
            target,
            address,
            args,
        } => {
            let node = Node::bind("0.0.0.0:0")?;
            let mut msg = Message::new(&address);
            for raw in &args {
                msg.append(coerce(raw));
            }
            node.send_to(target.as_str(), &Packet::Message(msg))?;
        }
        Command::Listen { bind } => {
            let node = Node::bind(&bind)?;
            let dispatcher = StandardDispatcher::new();
            dispatcher.add_handler("*", |msg: &Message, sender: Option<SocketAddr>| {
                match sender {
                    Some(addr) => println!("{addr} {msg}"),
                    None => println!("{msg}"),
                }
            })?;
            println!("listening on {}", node.local_addr()?);
            node.listen_and_serve(&dispatcher)?;
        }
    }
    Ok(())
}
