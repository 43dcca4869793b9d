// switch-controller qos tables

use crate::resource::{KeySpec, ParentKey, ResourceDef};
use crate::schema::Field;

static DOT1P_MAP_FIELDS: &[Field] = &[
    Field::string("name"),
    Field::string("description"),
    Field::string("egress_pri_tagging"),
    Field::string("priority_0"),
    Field::string("priority_1"),
    Field::string("priority_2"),
    Field::string("priority_3"),
    Field::string("priority_4"),
    Field::string("priority_5"),
    Field::string("priority_6"),
    Field::string("priority_7"),
];

pub static QOS_DOT1P_MAP: ResourceDef = ResourceDef {
    type_name: "fmgdevice_switch_controller_qos_dot1p_map",
    label: "SwitchControllerQosDot1PMap",
    path: "/pm/config/device/{device}/vdom/{vdom}/switch-controller/qos/dot1p-map",
    key: KeySpec::Field("name"),
    parents: &[],
    fields: DOT1P_MAP_FIELDS,
};

static IP_DSCP_MAP_MAP_FIELDS: &[Field] = &[
    Field::string("name"),
    Field::integer("cos_queue"),
    Field::string_set("diffserv"),
    Field::string_set("ip_precedence"),
    Field::string("value"),
];

static IP_DSCP_MAP_FIELDS: &[Field] = &[
    Field::string("name"),
    Field::string("description"),
    Field::block("map", IP_DSCP_MAP_MAP_FIELDS).keyed("name"),
];

pub static QOS_IP_DSCP_MAP: ResourceDef = ResourceDef {
    type_name: "fmgdevice_switch_controller_qos_ip_dscp_map",
    label: "SwitchControllerQosIpDscpMap",
    path: "/pm/config/device/{device}/vdom/{vdom}/switch-controller/qos/ip-dscp-map",
    key: KeySpec::Field("name"),
    parents: &[],
    fields: IP_DSCP_MAP_FIELDS,
};

pub static QOS_IP_DSCP_MAP_MAP: ResourceDef = ResourceDef {
    type_name: "fmgdevice_switch_controller_qos_ip_dscp_map_map",
    label: "SwitchControllerQosIpDscpMapMap",
    path: "/pm/config/device/{device}/vdom/{vdom}/switch-controller/qos/ip-dscp-map/{ip-dscp-map}/map",
    key: KeySpec::Field("name"),
    parents: &[ParentKey {
        attr: "ip_dscp_map",
        placeholder: "ip-dscp-map",
    }],
    fields: IP_DSCP_MAP_MAP_FIELDS,
};

static QUEUE_POLICY_COS_QUEUE_FIELDS: &[Field] = &[
    Field::string("name"),
    Field::string("description"),
    Field::string("drop_policy"),
    Field::string("ecn"),
    Field::integer("max_rate"),
    Field::integer("max_rate_percent"),
    Field::integer("min_rate"),
    Field::integer("min_rate_percent"),
    Field::integer("weight"),
];

static QUEUE_POLICY_FIELDS: &[Field] = &[
    Field::string("name"),
    Field::string("schedule"),
    Field::string("rate_by"),
    Field::block("cos_queue", QUEUE_POLICY_COS_QUEUE_FIELDS).keyed("name"),
];

pub static QOS_QUEUE_POLICY: ResourceDef = ResourceDef {
    type_name: "fmgdevice_switch_controller_qos_queue_policy",
    label: "SwitchControllerQosQueuePolicy",
    path: "/pm/config/device/{device}/vdom/{vdom}/switch-controller/qos/queue-policy",
    key: KeySpec::Field("name"),
    parents: &[],
    fields: QUEUE_POLICY_FIELDS,
};
