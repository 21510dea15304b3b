//! ABI bindings for the contracts the bridge talks to.

use alloy::sol;

sol! {
    /// Bridge contract. `burn` locks the sender's tokens on this chain and
    /// authorizes the mint on `chainId`.
    #[sol(rpc)]
    contract BridgeContract {
        function burn(address to, uint256 amount, uint256 chainId) external;
    }

    #[sol(rpc)]
    contract ERC20 {
        function balanceOf(address account) external view returns (uint256);
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
    }

    /// ENS registry, deployed at the same address on every network that has ENS.
    #[sol(rpc)]
    contract EnsRegistry {
        function resolver(bytes32 node) external view returns (address);
    }

    #[sol(rpc)]
    contract EnsResolver {
        function addr(bytes32 node) external view returns (address);
    }
}
