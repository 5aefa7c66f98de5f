use crate::{
    ast::{Command::*, *},
    error::{Error, ParseErrorKind, Result},
    labels::LabelAllocator,
    segment::{self, Address},
};

macro_rules! svec {
    ($($x:expr),* $(,)?) => (vec![$($x.to_string()),*]);
}

/// Base registers saved in the call frame, in push order.
const FRAME_BASES: [&str; 4] = ["LCL", "ARG", "THIS", "THAT"];

/// Words in a saved frame: return address plus the four bases.
pub const FRAME_SIZE: u16 = 5;

fn at<T: std::fmt::Display>(arg: T) -> String {
    format!("@{}", arg)
}

fn def(label: &str) -> String {
    format!("({})", label)
}

/// Push D onto the stack
fn push_d() -> Vec<String> {
    svec![
        "@SP",
        "M=M+1",
        "A=M-1", // Don't need to refetch SP; this is safe
        "M=D"
    ]
}

fn push(address: &Address) -> Vec<String> {
    let mut out = match address {
        Address::Literal(value) => svec![at(value), "D=A"],
        Address::Fixed(symbol) => svec![at(symbol), "D=M"],
        Address::BaseRelative(base, index) => svec![
            at(base),
            "D=M",
            at(index),
            "A=D+A", // A = SEG+index
            "D=M"    // D = value to push
        ],
    };
    out.extend(push_d());
    out
}

fn pop(address: &Address) -> std::result::Result<Vec<String>, ParseErrorKind> {
    match address {
        Address::Literal(_) => Err(ParseErrorKind::PopConstant),
        Address::Fixed(symbol) => Ok(svec!["@SP", "AM=M-1", "D=M", at(symbol), "M=D"]),
        Address::BaseRelative(base, index) => Ok(svec![
            at(base),
            "D=M",
            at(index),
            "D=D+A", // D = SEG+index
            "@R13",
            "M=D",    // Store target addr in R13
            "@SP",
            "AM=M-1", // SP--, A <- new SP (val to be popped)
            "D=M",
            "@R13",
            "A=M", // At the target address...
            "M=D"  // ... store the popped val
        ]),
    }
}

fn simple_un_op(comp: &str) -> Vec<String> {
    svec!["@SP", "A=M-1", format!("M={}", comp)]
}

// i.e. no conditions or jumps, just pop and run
fn simple_bin_op(comp: &str) -> Vec<String> {
    svec![
        "@SP",
        "AM=M-1",              // SP--, looking at top of stack now
        "D=M",                 // Right arg in D
        "A=A-1",               // Looking at second arg of stack, will overwrite
        format!("M={}", comp)  // Op and overwrite second element
    ]
}

/// Emits Hack assembly for one translation unit.
///
/// The label allocator is borrowed from the driver so that every unit in a
/// run draws from the same sequence.
pub struct Translator<'a> {
    unit: &'a str,
    labels: &'a mut LabelAllocator,
}

impl<'a> Translator<'a> {
    pub fn new(unit: &'a str, labels: &'a mut LabelAllocator) -> Self {
        Translator { unit, labels }
    }

    fn compare(&mut self, name: &str, jump: &str) -> Vec<String> {
        let id = self.labels.next_id();
        let true_sym = format!("{}_TRUE_{}", name, id);
        let end_sym = format!("{}_END_{}", name, id);
        svec![
            "@SP",
            "AM=M-1", // SP--, looking at top of stack now
            "D=M",    // Right arg in D
            "A=A-1",  // Looking at second arg of stack
            "D=M-D",
            at(&true_sym),
            format!("D;{}", jump),
            "@SP",
            "A=M-1",
            "M=0",
            at(&end_sym),
            "0;JMP",
            def(&true_sym),
            "@SP",
            "A=M-1",
            "M=-1", // True is all ones
            def(&end_sym)
        ]
    }

    fn if_goto(&self, label: &str) -> Vec<String> {
        svec![
            "@SP",
            "AM=M-1",
            "D=M", // Stack popped into D
            at(label),
            "D;JNE" // False is 0
        ]
    }

    fn function(&self, name: &str, locals: u16) -> Vec<String> {
        let zero = push(&Address::Literal(0));
        let mut out = svec![def(name)];
        for _ in 0..locals {
            out.extend(zero.iter().cloned());
        }
        out
    }

    fn call(&mut self, name: &str, args: u16) -> Vec<String> {
        let ret = format!("RETURN_{}_{}", name.replace('.', "_"), self.labels.next_id());

        let mut out = svec![at(&ret), "D=A"];
        out.extend(push_d());
        for base in FRAME_BASES {
            out.extend(svec![at(base), "D=M"]);
            out.extend(push_d());
        }
        out.extend(svec![
            "@SP",
            "D=M",
            at(u32::from(args) + u32::from(FRAME_SIZE)),
            "D=D-A",
            "@ARG",
            "M=D", // ARG = SP - args - 5
            "@SP",
            "D=M",
            "@LCL",
            "M=D", // LCL = SP
            at(name),
            "0;JMP",
            def(&ret)
        ]);
        out
    }

    fn ret(&self) -> Vec<String> {
        let mut out = svec![
            "@LCL",
            "D=M",
            "@R13",
            "M=D", // R13 = frame
            at(FRAME_SIZE),
            "A=D-A",
            "D=M",
            "@R14",
            "M=D", // R14 = return address, before *ARG can overwrite it
            "@SP",
            "AM=M-1",
            "D=M",
            "@ARG",
            "A=M",
            "M=D", // *ARG = return value
            "@ARG",
            "D=M+1",
            "@SP",
            "M=D" // SP = ARG+1
        ];
        for base in FRAME_BASES.iter().rev() {
            out.extend(svec!["@R13", "AM=M-1", "D=M", at(base), "M=D"]);
        }
        out.extend(svec!["@R14", "A=M", "0;JMP"]);
        out
    }

    /// Instructions for a single command, without the echoed source line.
    pub fn emit(&mut self, command: &Command) -> std::result::Result<Vec<String>, ParseErrorKind> {
        let block = match command {
            Push(seg, index) => push(&segment::resolve(self.unit, *seg, *index)),
            Pop(seg, index) => pop(&segment::resolve(self.unit, *seg, *index))?,
            Not => simple_un_op("!M"),
            Neg => simple_un_op("-M"),
            Add => simple_bin_op("D+M"),
            Sub => simple_bin_op("M-D"),
            And => simple_bin_op("D&M"),
            Or => simple_bin_op("D|M"),
            Eq => self.compare("EQ", "JEQ"),
            Gt => self.compare("GT", "JGT"),
            Lt => self.compare("LT", "JLT"),
            Label(sym) => svec![def(sym)],
            Goto(sym) => svec![at(sym), "0;JMP"],
            IfGoto(sym) => self.if_goto(sym),
            Function(name, locals) => self.function(name, *locals),
            Call(name, args) => self.call(name, *args),
            Return => self.ret(),
        };
        Ok(block)
    }

    /// `SP = 256` followed by `call Sys.init 0`.
    pub fn bootstrap(&mut self) -> Vec<String> {
        let mut out = svec!["// bootstrap", "@256", "D=A", "@SP", "M=D", "// call Sys.init 0"];
        out.extend(self.call("Sys.init", 0));
        out
    }

    pub fn translate(&mut self, program: &[Instruction]) -> Result<Vec<String>> {
        let mut instructions: Vec<String> = vec![];

        for instruction in program {
            log::trace!("Handling instruction: {:?}", instruction.command);
            let translated = self.emit(&instruction.command).map_err(|kind| Error::Parse {
                unit: self.unit.to_string(),
                line: instruction.line,
                text: instruction.text.clone(),
                kind,
            })?;

            instructions.push(format!("// {}", instruction.text));
            instructions.extend(translated);
        }

        Ok(instructions)
    }
}
