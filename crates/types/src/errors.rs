use std::fmt;
use thiserror::Error;

// ============================================================================
// Main Error Enum
// ============================================================================

/// Error taxonomy for the Strata pricing engine.
///
/// Every failure is terminal for the call that raised it. The calculators are
/// pure, so retrying with unchanged input reproduces the same error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StrataError {
    // ========================================================================
    // Boundary Errors
    // ========================================================================

    /// A boundary value could not be parsed into its fixed-point/integer form
    #[error("Malformed input for '{field}': got '{value}' ({reason})")]
    MalformedInput { field: String, value: String, reason: String },

    // ========================================================================
    // Math Errors
    // ========================================================================

    /// Arithmetic result exceeds the representable range
    #[error("Math overflow in '{operation}' with values: {values:?}")]
    Overflow { operation: String, values: Vec<String> },

    /// Arithmetic result would be negative
    #[error("Math underflow in '{operation}' with values: {values:?}")]
    Underflow { operation: String, values: Vec<String> },

    /// Division by zero
    #[error("Division by zero in context: {context}")]
    DivideByZero { context: String },

    /// Input outside the domain of a transcendental function
    #[error("Input {input} outside the domain of {function}")]
    Domain { function: &'static str, input: String },

    // ========================================================================
    // Curve and Trade Errors
    // ========================================================================

    /// The curve invariant is undefined for the given reserves/parameters
    #[error("Degenerate curve: {reason}")]
    DegenerateCurve { reason: String },

    /// Trade size below the pool's minimum transaction amount
    #[error("Amount too small: {amount} < minimum {minimum}")]
    AmountTooSmall { amount: String, minimum: String },

    /// The trade would push share reserves below the floor
    #[error("Share reserves {resulting} below minimum {minimum}")]
    BelowMinimumReserves { resulting: String, minimum: String },

    /// Curve proceeds exceed the face value of the shorted bonds
    #[error("Negative interest: proceeds {proceeds} exceed bond amount {bond_amount}")]
    NegativeInterest { proceeds: String, bond_amount: String },

    // ========================================================================
    // Configuration Errors
    // ========================================================================

    /// Invalid configuration
    #[error("Invalid configuration for '{component}': {reason}")]
    InvalidConfiguration { component: String, reason: String },
}

/// Fieldless discriminant of [`StrataError`], for hosts that surface the kind
/// separately from the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MalformedInput,
    Overflow,
    Underflow,
    DivideByZero,
    Domain,
    DegenerateCurve,
    AmountTooSmall,
    BelowMinimumReserves,
    NegativeInterest,
    InvalidConfiguration,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::MalformedInput => "MalformedInput",
            ErrorKind::Overflow => "Overflow",
            ErrorKind::Underflow => "Underflow",
            ErrorKind::DivideByZero => "DivideByZero",
            ErrorKind::Domain => "Domain",
            ErrorKind::DegenerateCurve => "DegenerateCurve",
            ErrorKind::AmountTooSmall => "AmountTooSmall",
            ErrorKind::BelowMinimumReserves => "BelowMinimumReserves",
            ErrorKind::NegativeInterest => "NegativeInterest",
            ErrorKind::InvalidConfiguration => "InvalidConfiguration",
        };
        f.write_str(name)
    }
}

impl StrataError {
    /// The kind of this error, without its context
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MalformedInput { .. } => ErrorKind::MalformedInput,
            Self::Overflow { .. } => ErrorKind::Overflow,
            Self::Underflow { .. } => ErrorKind::Underflow,
            Self::DivideByZero { .. } => ErrorKind::DivideByZero,
            Self::Domain { .. } => ErrorKind::Domain,
            Self::DegenerateCurve { .. } => ErrorKind::DegenerateCurve,
            Self::AmountTooSmall { .. } => ErrorKind::AmountTooSmall,
            Self::BelowMinimumReserves { .. } => ErrorKind::BelowMinimumReserves,
            Self::NegativeInterest { .. } => ErrorKind::NegativeInterest,
            Self::InvalidConfiguration { .. } => ErrorKind::InvalidConfiguration,
        }
    }

    /// Create a malformed input error
    pub fn malformed(field: &str, value: &str, reason: &str) -> Self {
        Self::MalformedInput {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create a math overflow error with context
    pub fn overflow(operation: &str, values: &[&dyn fmt::Display]) -> Self {
        Self::Overflow {
            operation: operation.to_string(),
            values: values.iter().map(|v| v.to_string()).collect(),
        }
    }

    /// Create a math underflow error with context
    pub fn underflow(operation: &str, values: &[&dyn fmt::Display]) -> Self {
        Self::Underflow {
            operation: operation.to_string(),
            values: values.iter().map(|v| v.to_string()).collect(),
        }
    }

    /// Create a division by zero error
    pub fn divide_by_zero(context: &str) -> Self {
        Self::DivideByZero {
            context: context.to_string(),
        }
    }

    /// Create a domain error for a transcendental function
    pub fn domain(function: &'static str, input: &dyn fmt::Display) -> Self {
        Self::Domain {
            function,
            input: input.to_string(),
        }
    }

    /// Create a degenerate curve error
    pub fn degenerate_curve(reason: &str) -> Self {
        Self::DegenerateCurve {
            reason: reason.to_string(),
        }
    }

    /// Create an amount too small error
    pub fn amount_too_small(amount: &dyn fmt::Display, minimum: &dyn fmt::Display) -> Self {
        Self::AmountTooSmall {
            amount: amount.to_string(),
            minimum: minimum.to_string(),
        }
    }

    /// Create a below minimum reserves error
    pub fn below_minimum_reserves(resulting: &dyn fmt::Display, minimum: &dyn fmt::Display) -> Self {
        Self::BelowMinimumReserves {
            resulting: resulting.to_string(),
            minimum: minimum.to_string(),
        }
    }

    /// Create a negative interest error
    pub fn negative_interest(proceeds: &dyn fmt::Display, bond_amount: &dyn fmt::Display) -> Self {
        Self::NegativeInterest {
            proceeds: proceeds.to_string(),
            bond_amount: bond_amount.to_string(),
        }
    }

    /// Create an invalid configuration error
    pub fn invalid_configuration(component: &str, reason: &str) -> Self {
        Self::InvalidConfiguration {
            component: component.to_string(),
            reason: reason.to_string(),
        }
    }
}
