mod order;
pub use order::SlotOrder;
