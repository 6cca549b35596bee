/// Protocol revision selecting gas and behavior rules.
///
/// The variants form a total order; every revision-dependent rule in the
/// core is an explicit `rev >= Revision::X` comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Revision {
    Frontier,
    Homestead,
    /// [EIP-150] gas forwarding (all-but-one-64th).
    TangerineWhistle,
    /// [EIP-160] EXP per-byte cost raised to 50.
    SpuriousDragon,
    Byzantium,
    Constantinople,
    Petersburg,
    Istanbul,
    /// [EIP-2929] cold/warm account and storage access.
    Berlin,
    /// [EIP-3529] reduced storage-clear refunds.
    London,
    Paris,
    /// [EIP-3855] PUSH0, [EIP-3860] initcode metering.
    Shanghai,
    /// [EIP-1153] transient storage, [EIP-5656] MCOPY, [EIP-4844] blobs.
    Cancun,
}
