//! Inbound query dispatch
//!
//! Each handled method maps to a plain function taking the device callbacks
//! and the query and returning the message to send back. Handlers never
//! touch the client; `deliver` sends their output.

use xiot_core::message::{GET_PROPERTIES_METHOD, INVOKE_ACTION_METHOD, SET_PROPERTIES_METHOD};
use xiot_core::{IqError, IqQuery, IqReply, OperationStatus, QueryKind};
use xiot_device::DeviceHandlers;
use xiot_xcp::XcpClient;

/// Description sent back for queries a handler cannot process
pub const INVALID_QUERY: &str = "invalid query";

/// Message answering an inbound query
#[derive(Debug, Clone, PartialEq)]
pub enum Outbound {
    Result(IqReply),
    Error(IqError),
}

pub type QueryHandler = fn(&dyn DeviceHandlers, IqQuery) -> Outbound;

/// Methods the adapter registers with the client, and their handlers
pub const HANDLERS: [(&str, QueryHandler); 3] = [
    (GET_PROPERTIES_METHOD, get_properties as QueryHandler),
    (SET_PROPERTIES_METHOD, set_properties as QueryHandler),
    (INVOKE_ACTION_METHOD, invoke_action as QueryHandler),
];

pub fn handler_for(method: &str) -> Option<QueryHandler> {
    HANDLERS
        .iter()
        .find(|(name, _)| *name == method)
        .map(|(_, handler)| *handler)
}

/// Route a query to the handler registered for its method
pub fn dispatch(device: &dyn DeviceHandlers, query: IqQuery) -> Outbound {
    match handler_for(query.method()) {
        Some(handler) => handler(device, query),
        None => {
            log::warn!("no handler for method {} (query {})", query.method(), query.id);
            invalid(&query)
        }
    }
}

/// Send a handler's output through the client
pub fn deliver(client: &dyn XcpClient, outbound: Outbound) {
    match outbound {
        Outbound::Result(reply) => client.send_result(reply),
        Outbound::Error(error) => {
            log::warn!("rejecting query: {}", error);
            client.send_error(error);
        }
    }
}

fn invalid(query: &IqQuery) -> Outbound {
    Outbound::Error(query.error(OperationStatus::Undefined, INVALID_QUERY))
}

/// Read every requested property, then answer with the filled-in list
pub fn get_properties(device: &dyn DeviceHandlers, mut query: IqQuery) -> Outbound {
    match &mut query.kind {
        QueryKind::GetProperties { properties } => {
            for operation in properties.iter_mut() {
                device.get_property(operation);
            }
        }
        _ => return invalid(&query),
    }
    Outbound::Result(query.result().into())
}

/// Write every requested property, then answer with the per-property statuses
pub fn set_properties(device: &dyn DeviceHandlers, mut query: IqQuery) -> Outbound {
    match &mut query.kind {
        QueryKind::SetProperties { properties } => {
            for operation in properties.iter_mut() {
                device.set_property(operation);
            }
        }
        _ => return invalid(&query),
    }
    Outbound::Result(query.result().into())
}

/// Invoke the action, then echo the query itself as the result
pub fn invoke_action(device: &dyn DeviceHandlers, mut query: IqQuery) -> Outbound {
    match &mut query.kind {
        QueryKind::InvokeAction { operation } => device.invoke_action(operation),
        _ => return invalid(&query),
    }
    Outbound::Result(IqReply::Query(query))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockClient, MockDevice};
    use mockall::Sequence;
    use mockall::predicate::eq;
    use xiot_core::{ActionOperation, Aid, Argument, Pid, PropertyOperation, PropertyValue, ResultKind};

    fn get_query(pids: &[Pid]) -> IqQuery {
        IqQuery::new(
            "11",
            QueryKind::GetProperties {
                properties: pids.iter().copied().map(PropertyOperation::read).collect(),
            },
        )
    }

    fn action_query() -> IqQuery {
        IqQuery::new(
            "12",
            QueryKind::InvokeAction {
                operation: ActionOperation::new(Aid::new(2, 1), vec![Argument::new(1, 5i64)]),
            },
        )
    }

    fn expect_invalid(outbound: Outbound, id: &str) {
        match outbound {
            Outbound::Error(error) => {
                assert_eq!(error.id, id);
                assert_eq!(error.status, OperationStatus::Undefined);
                assert_eq!(error.description, INVALID_QUERY);
            }
            other => panic!("expected error, got {:?}", other),
        }
    }

    #[test]
    fn test_handler_table() {
        assert!(handler_for(GET_PROPERTIES_METHOD).is_some());
        assert!(handler_for(SET_PROPERTIES_METHOD).is_some());
        assert!(handler_for(INVOKE_ACTION_METHOD).is_some());
        assert!(handler_for("ping").is_none());
    }

    #[test]
    fn test_get_properties_mismatch_skips_device() {
        // no expectations: any callback panics
        let device = MockDevice::new();
        let query = IqQuery::new("3", QueryKind::SetProperties { properties: vec![] });
        expect_invalid(get_properties(&device, query), "3");
    }

    #[test]
    fn test_set_properties_mismatch_skips_device() {
        let device = MockDevice::new();
        expect_invalid(set_properties(&device, get_query(&[Pid::new(2, 1)])), "11");
    }

    #[test]
    fn test_invoke_action_mismatch_skips_device() {
        let device = MockDevice::new();
        expect_invalid(invoke_action(&device, get_query(&[])), "11");
    }

    #[test]
    fn test_get_properties_reads_in_order() {
        let pids = [Pid::new(2, 1), Pid::new(2, 2), Pid::new(3, 1)];
        let mut device = MockDevice::new();
        let mut seq = Sequence::new();
        for (i, pid) in pids.iter().copied().enumerate() {
            device
                .expect_get_property()
                .withf(move |op| op.pid == pid)
                .times(1)
                .in_sequence(&mut seq)
                .returning(move |op| {
                    op.value = Some(PropertyValue::Int(i as i64));
                    op.status = OperationStatus::Completed;
                });
        }

        let outbound = get_properties(&device, get_query(&pids));
        let Outbound::Result(IqReply::Result(result)) = outbound else {
            panic!("expected result");
        };
        assert_eq!(result.id, "11");
        let ResultKind::GetProperties { properties } = result.kind else {
            panic!("expected get-properties result");
        };
        let values: Vec<_> = properties.iter().map(|op| op.value.clone()).collect();
        assert_eq!(
            values,
            vec![
                Some(PropertyValue::Int(0)),
                Some(PropertyValue::Int(1)),
                Some(PropertyValue::Int(2))
            ]
        );
    }

    #[test]
    fn test_set_properties_writes_each() {
        let mut device = MockDevice::new();
        device
            .expect_set_property()
            .times(2)
            .returning(|op| op.status = OperationStatus::Completed);
        let query = IqQuery::new(
            "20",
            QueryKind::SetProperties {
                properties: vec![
                    PropertyOperation::write(Pid::new(2, 1), true),
                    PropertyOperation::write(Pid::new(2, 2), 3i64),
                ],
            },
        );

        let outbound = set_properties(&device, query);
        let Outbound::Result(IqReply::Result(result)) = outbound else {
            panic!("expected result");
        };
        let ResultKind::SetProperties { properties } = result.kind else {
            panic!("expected set-properties result");
        };
        assert!(properties.iter().all(|op| op.status == OperationStatus::Completed));
    }

    #[test]
    fn test_invoke_action_echoes_query() {
        let mut device = MockDevice::new();
        device
            .expect_invoke_action()
            .withf(|op| op.aid == Aid::new(2, 1) && op.arguments_in == vec![Argument::new(1, 5i64)])
            .times(1)
            .returning(|op| op.status = OperationStatus::Completed);

        let outbound = invoke_action(&device, action_query());
        let Outbound::Result(IqReply::Query(echoed)) = outbound else {
            panic!("expected echoed query");
        };
        assert_eq!(echoed.id, "12");
        let QueryKind::InvokeAction { operation } = echoed.kind else {
            panic!("expected invoke-action query");
        };
        assert_eq!(operation.status, OperationStatus::Completed);
    }

    #[test]
    fn test_dispatch_undecodable_payload() {
        let device = MockDevice::new();
        let query = IqQuery::new(
            "30",
            QueryKind::Unknown {
                method: GET_PROPERTIES_METHOD.to_string(),
            },
        );
        expect_invalid(dispatch(&device, query), "30");
    }

    #[test]
    fn test_dispatch_unregistered_method() {
        let device = MockDevice::new();
        expect_invalid(dispatch(&device, IqQuery::new("31", QueryKind::Ping)), "31");
    }

    #[test]
    fn test_deliver_result_and_error() {
        let mut client = MockClient::new();
        client
            .expect_send_result()
            .withf(|reply| reply.id() == "12")
            .times(1)
            .return_const(());
        client
            .expect_send_error()
            .with(eq(IqQuery::new("4", QueryKind::Ping).error(OperationStatus::Undefined, INVALID_QUERY)))
            .times(1)
            .return_const(());

        deliver(&client, Outbound::Result(IqReply::Query(action_query())));
        deliver(&client, invalid(&IqQuery::new("4", QueryKind::Ping)));
    }
}
