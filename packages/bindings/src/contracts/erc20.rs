use alloy_primitives::{Address, B256};
use alloy_provider::DynProvider;
use alloy_sol_macro::sol;
use alloy_sol_types::SolEvent;

use crate::{ContractBinding, EventBinding};

sol!(
    #[allow(missing_docs)]
    #[sol(rpc, abi)]
    #[derive(Debug, PartialEq, Eq)]
    interface IERC20 {
        event Transfer(address indexed from, address indexed to, uint256 value);
        event Approval(address indexed owner, address indexed spender, uint256 value);

        function name() external view returns (string memory);
        function symbol() external view returns (string memory);
        function decimals() external view returns (uint8);
        function totalSupply() external view returns (uint256);
        function balanceOf(address account) external view returns (uint256);
        function transfer(address to, uint256 value) external returns (bool);
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 value) external returns (bool);
        function transferFrom(address from, address to, uint256 value) external returns (bool);
    }
);

pub use IERC20::{Approval, IERC20Calls, IERC20Events, IERC20Instance, Transfer};

pub type Erc20T = IERC20Instance<DynProvider>;

pub struct Erc20Contract;

impl ContractBinding for Erc20Contract {
    const NAME: &'static str = "IERC20";
    const ABI: &'static str = include_str!("../../abi/IERC20.json");
    type Calls = IERC20Calls;
}

impl EventBinding for Erc20Contract {
    type Events = IERC20Events;
    const EVENT_TOPICS: &'static [(&'static str, B256)] = &[
        ("Transfer", Transfer::SIGNATURE_HASH),
        ("Approval", Approval::SIGNATURE_HASH),
    ];
}

/// Tokens are attached to, never deployed from an interface
pub fn at(address: Address, provider: &DynProvider) -> Erc20T {
    IERC20::new(address, provider.clone())
}

#[cfg(test)]
mod test {
    use super::*;
    use alloy_primitives::{Log, U256};

    #[test]
    fn transfer_and_approval_dispatch() {
        let transfer = Transfer {
            from: Address::repeat_byte(1),
            to: Address::repeat_byte(2),
            value: U256::from(10u64),
        };
        let approval = Approval {
            owner: Address::repeat_byte(1),
            spender: Address::repeat_byte(3),
            value: U256::MAX,
        };

        let token = Address::repeat_byte(0x20);
        let logs = [
            Log {
                address: token,
                data: transfer.encode_log_data(),
            },
            Log {
                address: token,
                data: approval.encode_log_data(),
            },
        ];

        let parsed: Vec<_> = logs
            .iter()
            .map(|log| Erc20Contract::parse_log(log).unwrap())
            .collect();

        assert_eq!(
            parsed,
            vec![
                IERC20Events::Transfer(transfer),
                IERC20Events::Approval(approval)
            ]
        );
    }

    #[test]
    fn well_known_transfer_topic() {
        assert_eq!(
            Transfer::SIGNATURE_HASH,
            alloy_primitives::b256!(
                "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef"
            )
        );
    }
}
