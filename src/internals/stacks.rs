// Stack management and reference words.
//
// Stacks are named by first-class terms and live until process exit.
// References are scoped to the stack they were set on: switching
// stacks hides the previous stack's references.

use crate::error::CharmError;
use crate::runner::{int_operand, Runner};

impl Runner {
    /// createstack ( n name -- ) Create a stack with capacity n and
    /// make it current.
    pub fn f_createstack(&mut self) -> Result<(), CharmError> {
        let name = self.pop_operand("createstack")?;
        let capacity = self.pop_operand("createstack")?;
        let capacity = int_operand(&capacity, "createstack")?;
        if capacity <= 0 {
            return Err(CharmError::TypeError(
                "negative integer or zero passed to `createstack`".to_string(),
            ));
        }
        self.stacks.create(capacity as usize, name);
        Ok(())
    }

    /// getstack ( -- name ) Push the current stack's name.
    pub fn f_getstack(&mut self) -> Result<(), CharmError> {
        let name = self.stacks.current().name.clone();
        self.push_term(name)
    }

    /// switchstack ( name -- ) Make the named stack current.
    pub fn f_switchstack(&mut self) -> Result<(), CharmError> {
        let name = self.pop_operand("switchstack")?;
        self.stacks.switch(&name)
    }

    /// getref ( name -- t ) Read a reference cell on the current
    /// stack. Unset names read as an empty list.
    pub fn f_getref(&mut self) -> Result<(), CharmError> {
        let name = self.pop_operand("getref")?;
        let value = self.stacks.get_ref(&name);
        self.push_term(value)
    }

    /// setref ( name t -- ) Bind a reference cell on the current stack.
    pub fn f_setref(&mut self) -> Result<(), CharmError> {
        let value = self.pop_operand("setref")?;
        let name = self.pop_operand("setref")?;
        self.stacks.set_ref(name, value);
        Ok(())
    }
}
