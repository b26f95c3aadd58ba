// General-purpose operators: comparisons, stack juggling, booleans,
// arithmetic, and the `type` inspector.
//
// All of them work against the current stack. Arithmetic is defined on
// the integer tag only; `abs` is the one operator that also accepts
// floats, and `toint` is the only narrowing conversion.

use crate::error::CharmError;
use crate::runner::Runner;
use crate::term::{CharmNumber, Term};

impl Runner {
    /// type ( t -- t s ) Peek the top term and push its variant name.
    pub fn f_type(&mut self) -> Result<(), CharmError> {
        let f1 = self.pop_operand("type")?;
        let name = f1.variant_name();
        self.push_term(f1)?;
        self.push_term(Term::string(name))
    }

    /// eq ( a b -- n ) Structural equality as 1 or 0. Numbers with
    /// mixed integer/float tags are never equal.
    pub fn f_eq(&mut self) -> Result<(), CharmError> {
        let f1 = self.pop_operand("eq")?;
        let f2 = self.pop_operand("eq")?;
        self.push_term(Term::int(if f1 == f2 { 1 } else { 0 }))
    }

    pub fn f_dup(&mut self) -> Result<(), CharmError> {
        let f1 = self.pop_operand("dup")?;
        self.push_term(f1.clone())?;
        self.push_term(f1)
    }

    pub fn f_pop(&mut self) -> Result<(), CharmError> {
        self.stacks.current_mut().pop().map(|_| ())
    }

    /// swap ( j i -- ) Swap the cells at depths i and j. Both indices
    /// must be non-negative and below the current stack's capacity.
    pub fn f_swap(&mut self) -> Result<(), CharmError> {
        let (i, j) = self.pop_int2("swap")?;
        if i < 0 || j < 0 {
            return Err(CharmError::IndexOutOfRange(
                "negative index passed to `swap`".to_string(),
            ));
        }
        let capacity = self.stacks.current().capacity() as i64;
        if i >= capacity || j >= capacity {
            return Err(CharmError::IndexOutOfRange(
                "overflowing index passed to `swap`".to_string(),
            ));
        }
        self.stacks.current_mut().swap(i as usize, j as usize)
    }

    /// xor ( a b -- n ) Exclusive or of the truthiness of two integers.
    pub fn f_xor(&mut self) -> Result<(), CharmError> {
        let (a, b) = self.pop_int2("xor")?;
        self.push_term(Term::int(((a > 0) ^ (b > 0)) as i64))
    }

    pub fn f_plus(&mut self) -> Result<(), CharmError> {
        let (a, b) = self.pop_int2("+")?;
        self.push_term(Term::int(a + b))
    }

    /// - ( a b -- a-b ) Second-popped minus first-popped.
    pub fn f_minus(&mut self) -> Result<(), CharmError> {
        let (first, second) = self.pop_int2("-")?;
        self.push_term(Term::int(second - first))
    }

    pub fn f_times(&mut self) -> Result<(), CharmError> {
        let (a, b) = self.pop_int2("*")?;
        self.push_term(Term::int(a * b))
    }

    /// / ( a b -- a%b a/b ) Integer division of the second-popped by
    /// the first-popped, pushing the remainder and then the quotient.
    pub fn f_divide(&mut self) -> Result<(), CharmError> {
        let (divisor, dividend) = self.pop_int2("/")?;
        if divisor == 0 {
            return Err(CharmError::DivisionByZero(
                "zero divisor passed to `/`".to_string(),
            ));
        }
        self.push_term(Term::int(dividend % divisor))?;
        self.push_term(Term::int(dividend / divisor))
    }

    /// abs ( n -- |n| ) Absolute value of an integer or a float.
    pub fn f_abs(&mut self) -> Result<(), CharmError> {
        let f1 = self.pop_operand("abs")?;
        match f1 {
            Term::Number(CharmNumber::Int(v)) => self.push_term(Term::int(v.abs())),
            Term::Number(CharmNumber::Float(v)) => self.push_term(Term::float(v.abs())),
            _ => Err(CharmError::TypeError(
                "non number passed to `abs`".to_string(),
            )),
        }
    }

    /// toint ( n -- i ) Truncate a float toward zero; integers pass
    /// through untouched.
    pub fn f_toint(&mut self) -> Result<(), CharmError> {
        let f1 = self.pop_operand("toint")?;
        match f1 {
            Term::Number(CharmNumber::Int(_)) => self.push_term(f1),
            Term::Number(CharmNumber::Float(v)) => self.push_term(Term::int(v as i64)),
            _ => Err(CharmError::TypeError(
                "non number passed to `toint`".to_string(),
            )),
        }
    }

    /// q ( t -- [t] ) Wrap the top term in a one-element list.
    pub fn f_q(&mut self) -> Result<(), CharmError> {
        let f1 = self.pop_operand("q")?;
        self.push_term(Term::list(vec![f1]))
    }
}
