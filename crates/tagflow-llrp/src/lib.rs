//! Typed LLRP message surface for the tagflow reader controller.
//!
//! Wire encoding and binary parameter layout live in the protocol client
//! behind the connection trait; this crate models the messages themselves —
//! commands, replies, the ROSpec inventory plan, and the asynchronous
//! notification stream — as closed Rust types, plus the single reply
//! checker every command goes through.

pub mod check;
pub mod command;
pub mod reply;
pub mod report;
pub mod rospec;

pub use check::check;
pub use command::{
    Command, EventNotificationState, GetReaderConfig, KeepaliveSpec, NotificationEvent,
    RequestedData, SetReaderConfig, VendorRequestedData,
};
pub use reply::{ErrorMessage, ReaderConfigSummary, Reply, Response, ResponseBody};
pub use report::{
    AirProtocolTagData, CycleBoundary, EpcField, Notification, RoSpecEvent, TagObservation,
    TagReport, VendorParameter,
};
pub use rospec::{
    AiSpec, AiStopTrigger, AirProtocol, AntennaRfConfig, BoundarySpec, ContentSelector,
    InventoryParameterSpec, ReportSpec, ReportTrigger, RoSpec, RoSpecBuilder, RoSpecState,
    StartTrigger, StopTrigger, VendorReportSelector,
};
