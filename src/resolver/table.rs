//! Built-in name tables
//!
//! Keys are canonical distribution names (lower-case, `-` separated). These
//! tables are the defaults; a config file can extend or replace entries.

/// Distributions whose import name differs from what the fallback rule yields
pub static BUILTIN_OVERRIDES: &[(&str, &str)] = &[
    ("pyyaml", "yaml"),
    ("aaz-dev-tools", "aaz_dev"),
    ("azure-devtools", "azure_devtools"),
    ("beautifulsoup4", "bs4"),
    ("pillow", "PIL"),
    ("scikit-learn", "sklearn"),
    ("scikit-image", "skimage"),
    ("python-dateutil", "dateutil"),
    ("python-dotenv", "dotenv"),
    ("python-magic", "magic"),
    ("python-levenshtein", "Levenshtein"),
    ("opencv-python", "cv2"),
    ("opencv-python-headless", "cv2"),
    ("opencv-contrib-python", "cv2"),
    ("pyjwt", "jwt"),
    ("pyopenssl", "OpenSSL"),
    ("pycryptodome", "Crypto"),
    ("pycryptodomex", "Cryptodome"),
    ("attrs", "attr"),
    ("protobuf", "google.protobuf"),
    ("google-auth", "google.auth"),
    ("google-api-core", "google.api_core"),
    ("google-api-python-client", "googleapiclient"),
    ("grpcio", "grpc"),
    ("grpcio-tools", "grpc_tools"),
    ("pywin32", "win32api"),
    ("msgpack-python", "msgpack"),
    ("pymupdf", "fitz"),
    ("pyserial", "serial"),
    ("pyusb", "usb"),
    ("pyzmq", "zmq"),
    ("pygobject", "gi"),
    ("py-cpuinfo", "cpuinfo"),
    ("mysqlclient", "MySQLdb"),
    ("psycopg2-binary", "psycopg2"),
    ("websocket-client", "websocket"),
    ("dnspython", "dns"),
    ("ipython", "IPython"),
    ("pyqt5", "PyQt5"),
    ("pyqt6", "PyQt6"),
    ("faiss-cpu", "faiss"),
    ("llama-cpp-python", "llama_cpp"),
    ("discord.py", "discord"),
];

/// Hyphenated vendor prefixes and the package root their segments nest under
pub static BUILTIN_VENDOR_PREFIXES: &[(&str, &str)] = &[
    ("azure-", "azure"),
    ("google-cloud-", "google.cloud"),
    ("backports-", "backports"),
    ("opentelemetry-instrumentation-", "opentelemetry.instrumentation"),
];

/// Install and build tooling that is never imported as a library
pub static BUILTIN_SKIP: &[&str] = &["pip", "setuptools", "wheel", "build", "twine", "pip-tools"];
