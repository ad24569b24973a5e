use crate::agent::AgentId;
use crate::error::SimError;
use crate::transaction::Transaction;

/// Which leg of the two-leg path protocol a message is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Done,
}

/// An envelope carrying a transaction through the routing overlay.
///
/// On the UP leg, each holder names the next hop and `send_on` pushes the
/// holder onto the path stack before transferring. On the DOWN leg the
/// stack is consumed in reverse, so the return traversal retraces the UP
/// hops exactly and terminates at the originator, where the message
/// becomes `Done` and rejects further sends.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    direction: Direction,
    transaction: Transaction,
    originator: AgentId,
    path: Vec<AgentId>,
    next_dest: Option<AgentId>,
    holder: AgentId,
}

impl Message {
    /// A fresh UP message held by its originator.
    pub fn new(originator: AgentId, transaction: Transaction) -> Self {
        Self {
            direction: Direction::Up,
            transaction,
            originator,
            path: Vec::new(),
            next_dest: None,
            holder: originator,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn originator(&self) -> AgentId {
        self.originator
    }

    pub fn holder(&self) -> AgentId {
        self.holder
    }

    /// The UP hops recorded so far, oldest at the bottom.
    pub fn path(&self) -> &[AgentId] {
        &self.path
    }

    pub fn next_dest(&self) -> Option<AgentId> {
        self.next_dest
    }

    pub fn transaction(&self) -> &Transaction {
        &self.transaction
    }

    pub fn transaction_mut(&mut self) -> &mut Transaction {
        &mut self.transaction
    }

    pub fn into_transaction(self) -> Transaction {
        self.transaction
    }

    /// Record the next UP hop. Quietly ignored unless the message is on
    /// its UP leg; naming the current holder is a circular send.
    pub fn set_next_dest(&mut self, dest: AgentId) -> Result<(), SimError> {
        if self.direction != Direction::Up {
            return Ok(());
        }
        if dest == self.holder {
            return Err(SimError::Circular { agent: dest });
        }
        self.next_dest = Some(dest);
        Ok(())
    }

    /// Forward per the current direction, returning the new holder.
    pub fn send_on(&mut self) -> Result<AgentId, SimError> {
        match self.direction {
            Direction::Up => {
                let dest = self.next_dest.ok_or(SimError::NoDestination {
                    holder: self.holder,
                })?;
                if dest == self.originator {
                    return Err(SimError::Circular { agent: dest });
                }
                self.path.push(self.holder);
                self.holder = dest;
                self.next_dest = None;
                Ok(dest)
            }
            Direction::Down => {
                let dest = self.path.pop().ok_or(SimError::TerminalMessage)?;
                self.holder = dest;
                if self.path.is_empty() {
                    self.direction = Direction::Done;
                }
                Ok(dest)
            }
            Direction::Done => Err(SimError::TerminalMessage),
        }
    }

    /// Flip UP to DOWN (or back). The originator is not pushed at flip
    /// time; the stack already holds every intermediate hop in order.
    pub fn reverse_direction(&mut self) -> Result<(), SimError> {
        self.direction = match self.direction {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Done => return Err(SimError::WrongDirection),
        };
        Ok(())
    }
}
