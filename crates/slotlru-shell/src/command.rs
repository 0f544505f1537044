//! Shell command parser
//!
//! Lines are split on whitespace. A token wrapped in double quotes may hold
//! spaces and the escapes `\"` and `\\`.

use thiserror::Error;

/// Errors produced while turning a line into a command
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unterminated quoted string")]
    UnterminatedQuote,

    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    #[error("wrong number of arguments for '{0}' command")]
    WrongArity(&'static str),
}

/// A parsed shell command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Ping(Option<String>),
    Get(String),
    Put(String, String),
    Del(Vec<String>),
    Exists(Vec<String>),
    Peek(String),
    Len,
    Dump,
    Clear,
    Info,
    Quit,
}

impl Command {
    /// Parse one input line. Blank lines and `#` comments give `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Command>, ParseError> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(None);
        }

        let mut tokens = tokenize(trimmed)?.into_iter();
        let name = match tokens.next() {
            Some(name) => name.to_uppercase(),
            None => return Ok(None),
        };
        let args: Vec<String> = tokens.collect();

        let cmd = match name.as_str() {
            "PING" => match args.len() {
                0 => Command::Ping(None),
                1 => Command::Ping(args.into_iter().next()),
                _ => return Err(ParseError::WrongArity("ping")),
            },
            "GET" => Command::Get(single(args, "get")?),
            "PEEK" => Command::Peek(single(args, "peek")?),
            "PUT" | "SET" => {
                let [key, value]: [String; 2] = args
                    .try_into()
                    .map_err(|_| ParseError::WrongArity("put"))?;
                Command::Put(key, value)
            }
            "DEL" => Command::Del(at_least_one(args, "del")?),
            "EXISTS" => Command::Exists(at_least_one(args, "exists")?),
            "LEN" | "DBSIZE" => no_args(args, "len", Command::Len)?,
            "DUMP" => no_args(args, "dump", Command::Dump)?,
            "CLEAR" | "FLUSHDB" => no_args(args, "clear", Command::Clear)?,
            "INFO" => no_args(args, "info", Command::Info)?,
            "QUIT" | "EXIT" => Command::Quit,
            _ => return Err(ParseError::UnknownCommand(name)),
        };

        Ok(Some(cmd))
    }
}

fn single(args: Vec<String>, name: &'static str) -> Result<String, ParseError> {
    let [arg]: [String; 1] = args.try_into().map_err(|_| ParseError::WrongArity(name))?;
    Ok(arg)
}

fn at_least_one(args: Vec<String>, name: &'static str) -> Result<Vec<String>, ParseError> {
    if args.is_empty() {
        return Err(ParseError::WrongArity(name));
    }
    Ok(args)
}

fn no_args(args: Vec<String>, name: &'static str, cmd: Command) -> Result<Command, ParseError> {
    if !args.is_empty() {
        return Err(ParseError::WrongArity(name));
    }
    Ok(cmd)
}

/// Split a line into tokens, honouring double quotes
fn tokenize(line: &str) -> Result<Vec<String>, ParseError> {
    let mut tokens = Vec::new();
    let mut chars = line.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        let mut token = String::new();
        if c == '"' {
            chars.next();
            let mut closed = false;
            while let Some(c) = chars.next() {
                match c {
                    '"' => {
                        closed = true;
                        break;
                    }
                    '\\' => match chars.next() {
                        Some(escaped @ ('"' | '\\')) => token.push(escaped),
                        Some(other) => {
                            token.push('\\');
                            token.push(other);
                        }
                        None => return Err(ParseError::UnterminatedQuote),
                    },
                    _ => token.push(c),
                }
            }
            if !closed {
                return Err(ParseError::UnterminatedQuote);
            }
        } else {
            while let Some(&c) = chars.peek() {
                if c.is_whitespace() {
                    break;
                }
                token.push(c);
                chars.next();
            }
        }
        tokens.push(token);
    }

    Ok(tokens)
}
