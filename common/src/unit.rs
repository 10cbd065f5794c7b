//! Marker types.

/// Marker type describing a start of an entity's lifetime.
#[derive(Clone, Copy, Debug)]
pub struct Start;

/// Marker type describing an end of an entity's lifetime.
#[derive(Clone, Copy, Debug)]
pub struct End;

/// Marker type describing a billing period.
#[derive(Clone, Copy, Debug)]
pub struct Billing;

/// Marker type describing a payment.
#[derive(Clone, Copy, Debug)]
pub struct Payment;
