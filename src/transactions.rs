use std::{fs, marker::PhantomData, path::PathBuf};

/// Undo step for one filesystem change made while writing descriptors.
pub enum RollbackOperation {
    /// The file did not exist before the run.
    RemoveFile(PathBuf),
    /// The directory (and everything below it) was created by the run.
    RemoveDir(PathBuf),
    /// The file was overwritten; its previous contents are kept here.
    RestoreFile(PathBuf, Vec<u8>),
}
/// Active Transaction
pub struct Active;
/// Committed Transaction
pub struct Committed;
/// A trait that tells us if rollback should occur when dropped.
pub trait TransactionState {
    const SHOULD_ROLLBACK: bool;
}
impl TransactionState for Active {
    const SHOULD_ROLLBACK: bool = true;
}
impl TransactionState for Committed {
    const SHOULD_ROLLBACK: bool = false;
}
/// Tracks the filesystem changes of one generator run.
///
/// A `Transaction<Active>` that is dropped, typically because a write failed
/// and the error was propagated with `?`, undoes every registered operation
/// in reverse order: new descriptors are removed, overwritten ones get their
/// previous contents back, and directories created for them are deleted.
/// Calling [`Transaction::commit`] keeps everything.
///
/// # Example
///
/// ```rust,ignore
/// let mut trx = Transaction::<Active>::new();
/// trx.add_operation(RollbackOperation::RemoveFile("MyGame.project".into()));
/// trx.commit(); // No rollback will happen
/// ```
pub struct Transaction<State: TransactionState> {
    rollback_operations: Vec<RollbackOperation>,
    state: PhantomData<State>,
}
impl Transaction<Active> {
    pub fn new() -> Self {
        Transaction {
            rollback_operations: vec![],
            state: PhantomData,
        }
    }
    /// Registers the undo step of a change that has just been made.
    pub fn add_operation(&mut self, operation: RollbackOperation) {
        self.rollback_operations.push(operation);
    }
    /// Number of changes that would be undone right now.
    pub fn pending(&self) -> usize {
        self.rollback_operations.len()
    }
    /// Finalizes the transaction, preventing any rollback from occurring.
    pub fn commit(mut self) -> Transaction<Committed> {
        self.rollback_operations.clear();

        Transaction {
            rollback_operations: vec![],
            state: PhantomData,
        }
    }
}
impl Default for Transaction<Active> {
    fn default() -> Self {
        Self::new()
    }
}
impl<S: TransactionState> Drop for Transaction<S> {
    fn drop(&mut self) {
        if S::SHOULD_ROLLBACK && !self.rollback_operations.is_empty() {
            log::warn!("rolling back {} changes", self.rollback_operations.len());
            while let Some(operation) = self.rollback_operations.pop() {
                let (path, result) = match operation {
                    RollbackOperation::RemoveDir(path) => {
                        log::debug!("removing dir: {}", path.display());
                        let result = fs::remove_dir_all(&path);
                        (path, result)
                    }
                    RollbackOperation::RemoveFile(path) => {
                        log::debug!("removing file: {}", path.display());
                        let result = fs::remove_file(&path);
                        (path, result)
                    }
                    RollbackOperation::RestoreFile(path, contents) => {
                        log::debug!("restoring file: {}", path.display());
                        let result = fs::write(&path, contents);
                        (path, result)
                    }
                };

                if let Err(error) = result {
                    log::warn!("rollback failed for {}: {}", path.display(), error);
                }
            }
        } else if !S::SHOULD_ROLLBACK {
            log::debug!("committing transaction");
        }
    }
}
