use thiserror::Error;

/// Domain-level failures surfaced to the user with a specific reply.
/// Everything here aborts its operation with no partial effect; the
/// central error boundary in `commands::handling` does the translation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("That would take the account balance below zero.")]
    ConstraintViolation,
    #[error("You don't have enough coins in your account to send that much.")]
    InsufficientFunds,
    #[error("The transfer amount cannot be below 1.")]
    NonPositiveAmount,
    #[error("You can't send coins to yourself.")]
    SelfTransfer,
    #[error("You can't send coins to a bot.")]
    BotTransfer,
}

/// Pre-flight validation for a transfer between two users. The store
/// still enforces the balance floor; this keeps the failure replies
/// specific and avoids touching either row on bad input.
pub fn validate_transfer(
    amount: i64,
    from: u64,
    to: u64,
    to_is_bot: bool,
    from_balance: i64,
) -> Result<(), DomainError> {
    if amount <= 0 {
        return Err(DomainError::NonPositiveAmount);
    }

    if to_is_bot {
        return Err(DomainError::BotTransfer);
    }

    if from == to {
        return Err(DomainError::SelfTransfer);
    }

    if from_balance < amount {
        return Err(DomainError::InsufficientFunds);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_transfer_is_rejected() {
        assert_eq!(
            validate_transfer(-5, 1, 2, false, 100),
            Err(DomainError::NonPositiveAmount)
        );
    }

    #[test]
    fn zero_transfer_is_rejected() {
        assert_eq!(
            validate_transfer(0, 1, 2, false, 100),
            Err(DomainError::NonPositiveAmount)
        );
    }

    #[test]
    fn self_transfer_is_rejected() {
        assert_eq!(
            validate_transfer(10, 1, 1, false, 100),
            Err(DomainError::SelfTransfer)
        );
    }

    #[test]
    fn bot_transfer_is_rejected() {
        assert_eq!(
            validate_transfer(10, 1, 2, true, 100),
            Err(DomainError::BotTransfer)
        );
    }

    #[test]
    fn overdraft_is_rejected() {
        assert_eq!(
            validate_transfer(15, 1, 2, false, 10),
            Err(DomainError::InsufficientFunds)
        );
    }

    #[test]
    fn exact_balance_transfer_is_allowed() {
        assert_eq!(validate_transfer(20, 1, 2, false, 20), Ok(()));
    }
}
