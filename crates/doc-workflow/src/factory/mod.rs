mod workflow_factory;

pub use workflow_factory::{ContractService, DocumentSnapshot, NoticeService, WorkflowFactory, WorkflowService};
