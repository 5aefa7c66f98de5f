use nom::{
    branch::alt,
    bytes::complete::{is_a, tag, take_till1},
    character::{
        complete::{digit1, space0},
        is_digit,
    },
    combinator::{all_consuming, value, verify},
    sequence::preceded,
    IResult,
};

use crate::{
    ast::{Command::*, Segment::*, *},
    error::{Error, ParseErrorKind, Result},
    translator::FRAME_SIZE,
};

/// Largest value an `@literal` instruction can load.
pub const MAX_LITERAL: u16 = 32767;

/// `call` loads `nArgs + FRAME_SIZE` as a literal.
pub const MAX_CALL_ARGS: u16 = MAX_LITERAL - FRAME_SIZE;

fn segment(input: &str) -> IResult<&str, Segment> {
    alt((
        value(Constant, tag("constant")),
        value(Local, tag("local")),
        value(Static, tag("static")),
        value(Argument, tag("argument")),
        value(This, tag("this")),
        value(That, tag("that")),
        value(Pointer, tag("pointer")),
        value(Temp, tag("temp")),
    ))(input)
}

fn prim(input: &str) -> IResult<&str, Command> {
    alt((
        value(Add, tag("add")),
        value(Sub, tag("sub")),
        value(Neg, tag("neg")),
        value(Eq, tag("eq")),
        value(Gt, tag("gt")),
        value(Lt, tag("lt")),
        value(And, tag("and")),
        value(Or, tag("or")),
        value(Not, tag("not")),
    ))(input)
}

fn symbol(input: &str) -> IResult<&str, &str> {
    verify(
        is_a("abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ_.$:0123456789"),
        |c: &str| !is_digit(c.as_bytes()[0]),
    )(input)
}

/// A whitespace-delimited token, skipping any leading spaces or tabs.
fn word(input: &str) -> IResult<&str, &str> {
    preceded(space0, take_till1(|c: char| c == ' ' || c == '\t'))(input)
}

#[test]
fn test_word() {
    assert_eq!(word("  pointer\t32"), Ok(("\t32", "pointer")));
    assert!(word("   ").is_err());
}

/// Pulls operands off the remainder of a line, one token at a time.
struct Operands<'a> {
    command: &'a str,
    rest: &'a str,
}

impl<'a> Operands<'a> {
    fn next(&mut self, operand: &'static str) -> std::result::Result<&'a str, ParseErrorKind> {
        match word(self.rest) {
            Ok((rest, token)) => {
                self.rest = rest;
                Ok(token)
            }
            Err(_) => Err(ParseErrorKind::MissingOperand {
                command: self.command.to_string(),
                operand,
            }),
        }
    }

    fn finish(self) -> std::result::Result<(), ParseErrorKind> {
        let extra = self.rest.trim();
        if extra.is_empty() {
            Ok(())
        } else {
            Err(ParseErrorKind::TrailingInput(extra.to_string()))
        }
    }
}

/// A decimal operand no greater than `max`. Digit runs that overflow
/// are reported as too large, not as non-numeric.
fn number(
    token: &str,
    operand: &'static str,
    max: u16,
) -> std::result::Result<u16, ParseErrorKind> {
    let (_, digits) = all_consuming(digit1::<_, nom::error::Error<&str>>)(token).map_err(|_| {
        ParseErrorKind::InvalidNumber {
            operand,
            found: token.to_string(),
        }
    })?;
    match digits.parse::<u16>() {
        Ok(n) if n <= max => Ok(n),
        _ => Err(ParseErrorKind::TooLarge {
            operand,
            found: digits.to_string(),
            max,
        }),
    }
}

fn segment_index(
    operands: &mut Operands,
) -> std::result::Result<(Segment, u16), ParseErrorKind> {
    let token = operands.next("segment")?;
    let (_, seg) = all_consuming(segment)(token)
        .map_err(|_| ParseErrorKind::UnsupportedSegment(token.to_string()))?;
    let index = number(operands.next("index")?, "index", MAX_LITERAL)?;
    match seg.max_index() {
        Some(max) if index > max => Err(ParseErrorKind::IndexOutOfRange {
            segment: seg,
            index,
            max,
        }),
        _ => Ok((seg, index)),
    }
}

fn symbol_operand(
    operands: &mut Operands,
    operand: &'static str,
) -> std::result::Result<String, ParseErrorKind> {
    let token = operands.next(operand)?;
    all_consuming(symbol)(token)
        .map(|(_, sym)| sym.to_string())
        .map_err(|_| ParseErrorKind::InvalidSymbol(token.to_string()))
}

/// Parse one comment-free, trimmed, non-empty line.
pub fn command(line: &str) -> std::result::Result<Command, ParseErrorKind> {
    let (rest, name) =
        word(line).map_err(|_| ParseErrorKind::UnsupportedCommand(line.to_string()))?;
    let mut operands = Operands {
        command: name,
        rest,
    };

    let command = match name {
        "push" => {
            let (seg, index) = segment_index(&mut operands)?;
            Push(seg, index)
        }
        "pop" => {
            let (seg, index) = segment_index(&mut operands)?;
            if seg == Constant {
                return Err(ParseErrorKind::PopConstant);
            }
            Pop(seg, index)
        }
        "label" => Label(symbol_operand(&mut operands, "label")?),
        "goto" => Goto(symbol_operand(&mut operands, "label")?),
        "if-goto" => IfGoto(symbol_operand(&mut operands, "label")?),
        "function" => {
            let name = symbol_operand(&mut operands, "function name")?;
            let locals = number(operands.next("local count")?, "local count", MAX_LITERAL)?;
            Function(name, locals)
        }
        "call" => {
            let name = symbol_operand(&mut operands, "function name")?;
            let args = number(operands.next("argument count")?, "argument count", MAX_CALL_ARGS)?;
            Call(name, args)
        }
        "return" => Return,
        _ => match all_consuming(prim)(name) {
            Ok((_, prim)) => prim,
            Err(_) => return Err(ParseErrorKind::UnsupportedCommand(name.to_string())),
        },
    };

    operands.finish()?;
    Ok(command)
}

#[test]
fn test_push() {
    assert_eq!(command("push  pointer  1"), Ok(Push(Pointer, 1)));
    assert_eq!(command("push constant 32767"), Ok(Push(Constant, 32767)));
}

#[test]
fn test_pop() {
    assert_eq!(command("pop local 3"), Ok(Pop(Local, 3)));
    assert_eq!(command("pop constant 3"), Err(ParseErrorKind::PopConstant));
}

#[test]
fn test_prim() {
    assert_eq!(command("neg"), Ok(Neg));
    assert_eq!(command("gt"), Ok(Gt));
    assert_eq!(
        command("addx"),
        Err(ParseErrorKind::UnsupportedCommand("addx".to_string()))
    );
}

#[test]
fn test_branching() {
    assert_eq!(command("label LOOP_START"), Ok(Label("LOOP_START".to_string())));
    assert_eq!(
        command("if-goto Main.main$END"),
        Ok(IfGoto("Main.main$END".to_string()))
    );
    assert_eq!(
        command("goto 1abc"),
        Err(ParseErrorKind::InvalidSymbol("1abc".to_string()))
    );
}

#[test]
fn test_functions() {
    assert_eq!(command("function Math.max 2"), Ok(Function("Math.max".to_string(), 2)));
    assert_eq!(command("call Math.max 2"), Ok(Call("Math.max".to_string(), 2)));
    assert_eq!(command("return"), Ok(Return));
}

#[test]
fn test_call_argument_count_leaves_room_for_frame() {
    assert_eq!(
        command("call Foo 32762"),
        Ok(Call("Foo".to_string(), MAX_CALL_ARGS))
    );
    assert_eq!(
        command("call Foo 32763"),
        Err(ParseErrorKind::TooLarge {
            operand: "argument count",
            found: "32763".to_string(),
            max: MAX_CALL_ARGS,
        })
    );
    assert_eq!(command("function Foo 32767"), Ok(Function("Foo".to_string(), 32767)));
}

#[test]
fn test_operand_errors() {
    assert_eq!(
        command("push local"),
        Err(ParseErrorKind::MissingOperand {
            command: "push".to_string(),
            operand: "index",
        })
    );
    assert_eq!(
        command("push heap 0"),
        Err(ParseErrorKind::UnsupportedSegment("heap".to_string()))
    );
    assert_eq!(
        command("push temp 8"),
        Err(ParseErrorKind::IndexOutOfRange {
            segment: Temp,
            index: 8,
            max: 7,
        })
    );
    assert_eq!(
        command("push constant 40000"),
        Err(ParseErrorKind::TooLarge {
            operand: "index",
            found: "40000".to_string(),
            max: MAX_LITERAL,
        })
    );
    assert_eq!(
        command("push constant 99999999999"),
        Err(ParseErrorKind::TooLarge {
            operand: "index",
            found: "99999999999".to_string(),
            max: MAX_LITERAL,
        })
    );
    assert_eq!(
        command("push pointer 2"),
        Err(ParseErrorKind::IndexOutOfRange {
            segment: Pointer,
            index: 2,
            max: 1,
        })
    );
    assert_eq!(
        command("function Foo x"),
        Err(ParseErrorKind::InvalidNumber {
            operand: "local count",
            found: "x".to_string(),
        })
    );
    assert_eq!(
        command("return 1"),
        Err(ParseErrorKind::TrailingInput("1".to_string()))
    );
}

/// Parse a whole translation unit. `unit` names the source in diagnostics.
pub fn parse(unit: &str, input: &str) -> Result<Vec<Instruction>> {
    let mut instructions = vec![];

    for (index, raw) in input.lines().enumerate() {
        let line = raw.split_once("//").map(|(s, _)| s).unwrap_or(raw).trim();
        if line.is_empty() {
            continue;
        }

        let command = command(line).map_err(|kind| Error::Parse {
            unit: unit.to_string(),
            line: index + 1,
            text: raw.trim().to_string(),
            kind,
        })?;
        log::trace!("{}:{}: parsed {:?}", unit, index + 1, command);

        instructions.push(Instruction {
            line: index + 1,
            text: line.to_string(),
            command,
        });
    }

    Ok(instructions)
}

#[test]
fn test_parse_skips_comments() {
    let source = "// header\n\npush constant 7 // seven\n\tadd\r\n";
    let parsed = parse("Test", source).unwrap();
    assert_eq!(
        parsed,
        vec![
            Instruction {
                line: 3,
                text: "push constant 7".to_string(),
                command: Push(Constant, 7),
            },
            Instruction {
                line: 4,
                text: "add".to_string(),
                command: Add,
            },
        ]
    );
}

#[test]
fn test_parse_reports_line() {
    let err = parse("Test", "push constant 1\n\npop constant 2 // bad\n").unwrap_err();
    match err {
        Error::Parse {
            unit,
            line,
            text,
            kind,
        } => {
            assert_eq!(unit, "Test");
            assert_eq!(line, 3);
            assert_eq!(text, "pop constant 2 // bad");
            assert_eq!(kind, ParseErrorKind::PopConstant);
        }
        other => panic!("unexpected error {:?}", other),
    }
}
