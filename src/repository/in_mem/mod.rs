pub(super) mod order;
