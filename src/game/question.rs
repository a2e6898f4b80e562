//! Question Generation
//!
//! Produces arithmetic questions at a single, fixed difficulty.

use std::fmt;
use serde::{Serialize, Deserialize};

use crate::core::rng::DeterministicRng;

/// Arithmetic operation used in a question.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Addition
    Add,
    /// Subtraction (never produces a negative answer)
    Subtract,
    /// Multiplication
    Multiply,
}

impl Operation {
    /// Apply the operation to two operands.
    pub fn compute(self, left: i64, right: i64) -> i64 {
        match self {
            Operation::Add => left + right,
            Operation::Subtract => left - right,
            Operation::Multiply => left * right,
        }
    }

    /// Display symbol.
    pub fn symbol(self) -> &'static str {
        match self {
            Operation::Add => "+",
            Operation::Subtract => "-",
            Operation::Multiply => "×",
        }
    }
}

/// A question and its correct answer. Immutable once generated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Left operand
    pub left: i64,
    /// Right operand
    pub right: i64,
    /// Operation
    pub operation: Operation,
    /// Rendered expression, e.g. `"7 × 8"`
    pub text: String,
    /// Expected answer
    pub correct_answer: i64,
}

impl Question {
    /// Build a question from its parts.
    pub fn new(left: i64, operation: Operation, right: i64) -> Self {
        Self {
            left,
            right,
            operation,
            text: format!("{} {} {}", left, operation.symbol(), right),
            correct_answer: operation.compute(left, right),
        }
    }

    /// Placeholder held by the initial state before the first round.
    pub fn placeholder() -> Self {
        Self {
            left: 0,
            right: 0,
            operation: Operation::Add,
            text: String::new(),
            correct_answer: 0,
        }
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Difficulty parameters. Fixed per deployment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Difficulty {
    /// Smallest operand
    pub min_operand: i64,
    /// Largest operand
    pub max_operand: i64,
    /// Operations to draw from
    pub operations: Vec<Operation>,
}

impl Default for Difficulty {
    fn default() -> Self {
        Self {
            min_operand: 1,
            max_operand: 12,
            operations: vec![Operation::Add, Operation::Subtract, Operation::Multiply],
        }
    }
}

/// Generates questions from a seeded RNG.
#[derive(Clone, Debug)]
pub struct QuestionGenerator {
    difficulty: Difficulty,
    rng: DeterministicRng,
}

impl QuestionGenerator {
    /// Create a generator. Same difficulty and seed give the same sequence.
    pub fn new(difficulty: Difficulty, seed: u64) -> Self {
        Self {
            difficulty,
            rng: DeterministicRng::new(seed),
        }
    }

    /// Difficulty in use.
    pub fn difficulty(&self) -> &Difficulty {
        &self.difficulty
    }

    /// Generate the next question.
    pub fn generate(&mut self) -> Question {
        let operation = self.rng
            .choose(&self.difficulty.operations)
            .copied()
            .unwrap_or(Operation::Add);

        let a = self.rng.next_int_range(self.difficulty.min_operand, self.difficulty.max_operand);
        let b = self.rng.next_int_range(self.difficulty.min_operand, self.difficulty.max_operand);

        match operation {
            Operation::Subtract => Question::new(a.max(b), operation, a.min(b)),
            _ => Question::new(a, operation, b),
        }
    }
}
