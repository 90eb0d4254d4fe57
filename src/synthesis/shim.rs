//! Runtime shims that redirect loopback database connections to compose services

use super::connection::ConnectionVars;
use crate::stack::{ServiceKind, ShimKind};

pub const NODE_PRELOAD_FILE: &str = "stackup-shim.js";
pub const NODE_CONFIG_FILE: &str = "stackup-db-config.js";
pub const PYTHON_HOOK_FILE: &str = "sitecustomize.py";

/// Directory the shim directory is copied to inside the image.
pub const CONTAINER_SHIM_DIR: &str = "/opt/stackup";

/// One file to place in the shim directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShimFile {
    pub name: &'static str,
    pub content: String,
}

/// Files for `kind`, in write order.
pub fn render(kind: ShimKind, vars: &ConnectionVars) -> Vec<ShimFile> {
    match kind {
        ShimKind::NodePreload => vec![
            ShimFile {
                name: NODE_PRELOAD_FILE,
                content: node_preload(),
            },
            ShimFile {
                name: NODE_CONFIG_FILE,
                content: node_config_module(vars),
            },
        ],
        ShimKind::PythonSiteCustomize => vec![ShimFile {
            name: PYTHON_HOOK_FILE,
            content: python_hook(),
        }],
    }
}

fn node_preload() -> String {
    let host = ServiceKind::MySql.shim_host();
    let port = ServiceKind::MySql.port();
    format!(
        r#"// Generated by stackup. Redirects loopback MySQL connections to the compose service.
'use strict';

const Module = require('module');
const net = require('net');

const TARGET_HOST = '{host}';
const TARGET_PORT = {port};
const DEV_USER = process.env.DB_USER || 'devuser';
const DEV_PASSWORD = process.env.DB_PASSWORD || 'devpassword';
const LOOPBACK = new Set([undefined, null, '', 'localhost', '127.0.0.1']);

function rewrite(config) {{
  if (typeof config === 'string' || config === null || typeof config !== 'object') {{
    return config;
  }}
  const patched = Object.assign({{}}, config);
  if (LOOPBACK.has(patched.host)) {{
    patched.host = TARGET_HOST;
  }}
  if (patched.user === 'root') {{
    patched.user = DEV_USER;
    patched.password = DEV_PASSWORD;
  }}
  return patched;
}}

function wrap(factory) {{
  return function (config, ...rest) {{
    return factory.call(this, rewrite(config), ...rest);
  }};
}}

function patchDriver(driver) {{
  if (!driver || driver.__stackupPatched) {{
    return driver;
  }}
  for (const name of ['createConnection', 'createPool']) {{
    if (typeof driver[name] === 'function') {{
      driver[name] = wrap(driver[name]);
    }}
  }}
  if (typeof driver.createPoolCluster === 'function') {{
    const createCluster = driver.createPoolCluster;
    driver.createPoolCluster = function (...args) {{
      const cluster = createCluster.apply(this, args);
      const add = cluster.add;
      cluster.add = function (id, config) {{
        if (config === undefined) {{
          return add.call(this, rewrite(id));
        }}
        return add.call(this, id, rewrite(config));
      }};
      return cluster;
    }};
  }}
  Object.defineProperty(driver, '__stackupPatched', {{ value: true }});
  return driver;
}}

const DRIVERS = new Set(['mysql', 'mysql2', 'mysql2/promise']);
const originalLoad = Module._load;
Module._load = function (request, parent, isMain) {{
  const loaded = originalLoad.apply(this, arguments);
  return DRIVERS.has(request) ? patchDriver(loaded) : loaded;
}};

const originalConnect = net.Socket.prototype.connect;
net.Socket.prototype.connect = function (...args) {{
  let options = args[0];
  if (Array.isArray(options)) {{
    options = options[0];
  }}
  if (options && typeof options === 'object') {{
    if (Number(options.port) === TARGET_PORT && LOOPBACK.has(options.host)) {{
      options.host = TARGET_HOST;
    }}
  }} else if (Number(args[0]) === TARGET_PORT && LOOPBACK.has(args[1])) {{
    args[1] = TARGET_HOST;
  }}
  return originalConnect.apply(this, args);
}};
"#,
        host = host,
        port = port
    )
}

fn node_config_module(vars: &ConnectionVars) -> String {
    let mut out = String::from(
        "// Generated by stackup. Import this instead of hard-coding connection settings.\n'use strict';\n\nmodule.exports = {\n",
    );
    for (key, value) in vars.iter() {
        // serde_json gives correctly escaped JS string literals
        let literal = serde_json::Value::String(value.to_string()).to_string();
        out.push_str(&format!(
            "  {key}: process.env.{key} || {literal},\n",
            key = key,
            literal = literal
        ));
    }
    out.push_str("};\n");
    out
}

fn python_hook() -> String {
    let ports = ServiceKind::ALL
        .iter()
        .map(|s| format!("    {}: \"{}\",", s.port(), s.shim_host()))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        r#"# Generated by stackup. Redirects conventional database hostnames to compose services.
import socket

_PORT_HOSTS = {{
{ports}
}}
_ALIASES = {{"localhost", "127.0.0.1", "db", "database"}}

_original_getaddrinfo = socket.getaddrinfo
_original_create_connection = socket.create_connection


def _redirect(host, port):
    try:
        target = _PORT_HOSTS.get(int(port))
    except (TypeError, ValueError):
        return host
    if target and host in _ALIASES:
        return target
    return host


def _getaddrinfo(host, port, *args, **kwargs):
    return _original_getaddrinfo(_redirect(host, port), port, *args, **kwargs)


def _create_connection(address, *args, **kwargs):
    host, port = address[0], address[1]
    return _original_create_connection((_redirect(host, port), port), *args, **kwargs)


socket.getaddrinfo = _getaddrinfo
socket.create_connection = _create_connection
"#,
        ports = ports
    )
}
