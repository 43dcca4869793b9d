// user radius

use crate::resource::{KeySpec, ResourceDef};
use crate::schema::Field;

static ACCOUNTING_SERVER_FIELDS: &[Field] = &[
    Field::fosid(),
    Field::string("status"),
    Field::string("server"),
    Field::string_set("secret").sensitive(),
    Field::integer("port"),
    Field::string("source_ip"),
    Field::string("interface_select_method"),
    Field::string_set("interface"),
];

static RADIUS_FIELDS: &[Field] = &[
    Field::string("name"),
    Field::string("server"),
    Field::string_set("secret").sensitive(),
    Field::string("secondary_server"),
    Field::string_set("secondary_secret").sensitive(),
    Field::string("tertiary_server"),
    Field::string_set("tertiary_secret").sensitive(),
    Field::string("auth_type"),
    Field::string("nas_ip"),
    Field::string("nas_id_type"),
    Field::integer("radius_port"),
    Field::integer("timeout"),
    Field::string("all_usergroup"),
    Field::string("use_management_vdom"),
    Field::string_set("class"),
    Field::string("source_ip"),
    Field::string("interface_select_method"),
    Field::string_set("interface"),
    Field::block("accounting_server", ACCOUNTING_SERVER_FIELDS).keyed("fosid"),
];

pub static RADIUS: ResourceDef = ResourceDef {
    type_name: "fmgdevice_user_radius",
    label: "UserRadius",
    path: "/pm/config/device/{device}/vdom/{vdom}/user/radius",
    key: KeySpec::Field("name"),
    parents: &[],
    fields: RADIUS_FIELDS,
};
