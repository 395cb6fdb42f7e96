pub mod contract_flow;
pub mod notice_flow;

pub use contract_flow::{ContractState, ContractStateConfig};
pub use notice_flow::{NoticeState, NoticeStateConfig};
